// Application layer: the data-source seam, the dashboard service and its report types.

pub mod error;
pub mod reporting;
pub mod service;
pub mod source;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use source::*;
