use euclid::{Point2D, Vector2D};

pub type ConnectionId = u16;
/// Creation timestamp in milliseconds, as assigned by the client that created the element.
pub type ElementId = u64;
pub type AuthorId = String;

/// Pan/zoom-independent space every shared record is stored in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalSpace;

/// Pixel space of the drawing surface, after scale and pan are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSpace;

pub type LogicalPoint = Point2D<f64, LogicalSpace>;
pub type LogicalVector = Vector2D<f64, LogicalSpace>;
pub type ScreenPoint = Point2D<f64, ScreenSpace>;
pub type ScreenVector = Vector2D<f64, ScreenSpace>;
