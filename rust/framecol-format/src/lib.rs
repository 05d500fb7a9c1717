//! Frame format definitions: the logical column type system, the physical layout
//! constants of columnar frames, and the frame container handed to column readers.

pub mod column_type;
pub mod frame;
pub mod layout;

pub use column_type::{ColumnType, ValueType};
pub use frame::{Frame, FrameType};
