//! Managed-object doubles.

use std::cell::RefCell;
use std::rc::Rc;

use sizer_core::{ManagedObject, Point, Size};

/// Object with a fixed minimum size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestObject {
    min: Size,
    size: Size,
    position: Point,
    stubborn: bool,
    floor: Size,
}

impl TestObject {
    /// Object that accepts whatever size it is given.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            min: Size::new(width, height),
            size: Size::ZERO,
            position: Point::ORIGIN,
            stubborn: false,
            floor: Size::ZERO,
        }
    }

    /// Object that always takes at least its minimum, even when offered less
    /// along an axis.
    pub fn stubborn(width: i32, height: i32) -> Self {
        Self {
            stubborn: true,
            ..Self::new(width, height)
        }
    }

    /// Object that reports a `width` x `height` minimum but never takes less
    /// than `floor`, whatever it is offered.
    pub fn oversized(width: i32, height: i32, floor: Size) -> Self {
        Self {
            floor,
            ..Self::new(width, height)
        }
    }

    /// Last position received.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Change the intrinsic minimum. The owner must invalidate the object.
    pub fn set_min_size(&mut self, min: Size) {
        self.min = min;
    }
}

impl ManagedObject for TestObject {
    fn min_size(&self) -> Size {
        self.min
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) -> Size {
        let size = size.max(self.floor);
        self.size = if self.stubborn { size.max(self.min) } else { size };
        self.size
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// Everything a [`Probe`] was told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeLog {
    /// Sizes passed to `set_size`, in order
    pub sizes: Vec<Size>,
    /// Positions passed to `set_position`, in order
    pub positions: Vec<Point>,
    /// Number of `destroy` calls
    pub destroyed: usize,
}

impl ProbeLog {
    /// Most recent size.
    pub fn last_size(&self) -> Option<Size> {
        self.sizes.last().copied()
    }

    /// Most recent position.
    pub fn last_position(&self) -> Option<Point> {
        self.positions.last().copied()
    }

    /// Whether `destroy` was called at least once.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed > 0
    }
}

/// Object that records its calls.
///
/// ```
/// use sizer_test::Probe;
///
/// let (probe, log) = Probe::new(10, 10);
/// drop(probe);
/// assert!(log.borrow().sizes.is_empty());
/// ```
#[derive(Debug)]
pub struct Probe {
    min: Size,
    size: Size,
    log: Rc<RefCell<ProbeLog>>,
}

impl Probe {
    /// Create a probe and the handle to its log.
    pub fn new(width: i32, height: i32) -> (Self, Rc<RefCell<ProbeLog>>) {
        let log = Rc::new(RefCell::new(ProbeLog::default()));
        let probe = Self {
            min: Size::new(width, height),
            size: Size::ZERO,
            log: Rc::clone(&log),
        };
        (probe, log)
    }
}

impl ManagedObject for Probe {
    fn min_size(&self) -> Size {
        self.min
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) -> Size {
        self.size = size;
        self.log.borrow_mut().sizes.push(size);
        size
    }

    fn set_position(&mut self, position: Point) {
        self.log.borrow_mut().positions.push(position);
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed += 1;
    }
}
