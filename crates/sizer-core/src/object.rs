//! The contract every non-spacer payload satisfies.

use crate::geometry::{Point, Size};

/// A sized, positionable object managed by a layout.
///
/// Implementors are typically native widgets. The layout never creates them; it
/// asks for a minimum, hands out a size, and places them. An object may refuse a
/// size by returning a larger one from [`ManagedObject::set_size`], and the
/// returned value is what the layout uses from then on.
///
/// A child layout for an object is attached through the arena rather than the
/// trait, so implementors do not need to know about containers.
pub trait ManagedObject {
    /// Smallest size the object can be given.
    fn min_size(&self) -> Size;

    /// Current size.
    fn size(&self) -> Size;

    /// Resize the object and return the size actually taken.
    fn set_size(&mut self, size: Size) -> Size;

    /// Move the object's top-left corner to `position`.
    fn set_position(&mut self, position: Point);

    /// Called when the layout destroys the object as part of a cascade.
    fn destroy(&mut self) {}
}

impl<T: ManagedObject + ?Sized> ManagedObject for Box<T> {
    fn min_size(&self) -> Size {
        (**self).min_size()
    }

    fn size(&self) -> Size {
        (**self).size()
    }

    fn set_size(&mut self, size: Size) -> Size {
        (**self).set_size(size)
    }

    fn set_position(&mut self, position: Point) {
        (**self).set_position(position);
    }

    fn destroy(&mut self) {
        (**self).destroy();
    }
}
