//! View-model construction for status matrix documents.
//!
//! This module turns a raw [`StatusMatrixDocument`](crate::source::StatusMatrixDocument)
//! into a presentation-agnostic [`GridView`]. It performs no I/O and holds
//! no state between calls.
//!
//! ## Submodules
//!
//! - [`status`]: Status code classification ([`classify`], [`Severity`])
//! - [`value`]: Numeral+unit formatting for measurement averages
//! - [`cell`]: Per-cell label, severity and detail content
//! - [`grid`]: Row × column assembly and shape validation
//!
//! ## Data Flow
//!
//! ```text
//! StatusMatrixDocument (raw JSON)
//!        │
//!        ▼
//! GridBuilder::build()  ── ShapeMismatch on bad dimensions
//!        │
//!        ├──▶ build_cell_in() per row × column
//!        │       ├──▶ classify()
//!        │       └──▶ format_average()
//!        ▼
//!     GridView
//! ```

pub mod cell;
pub mod grid;
pub mod status;
pub mod value;

pub use cell::{build_cell, build_cell_in, CellView, Direction, TooltipContent};
pub use grid::{build, Axis, GridBuilder, GridView, RowView, SeverityCounts, ShapeMismatch};
pub use status::{classify, Classification, Severity};
pub use value::{format_average, FormattedValue};
