use tracing::{debug, warn};

/// Applies an ordered list of gif locations to a fixed set of display
/// slots.
///
/// Implementations may drive a DOM, a terminal, or nothing at all; the
/// poll loop only calls [`update`](DisplayUpdater::update) and never needs
/// a result back.
pub trait DisplayUpdater: Send {
    /// Apply `images[i]` to slot `i` for each provided index. Slots past
    /// the end of `images` keep whatever they were showing.
    fn update(&mut self, images: &[String]);
}

/// Slot-backed display that keeps the last applied image per slot.
///
/// Untouched slots retain their previous content, so a skipped tick leaves
/// the last good imagery on screen.
#[derive(Debug, Clone)]
pub struct SlotDisplay {
    slots: Vec<Option<String>>,
}

impl SlotDisplay {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    /// Current content of every slot, in order.
    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }
}

impl DisplayUpdater for SlotDisplay {
    fn update(&mut self, images: &[String]) {
        if images.len() > self.slots.len() {
            warn!(
                images = images.len(),
                slots = self.slots.len(),
                "more images than slots, extras dropped"
            );
        }
        for (index, (slot, image)) in self.slots.iter_mut().zip(images).enumerate() {
            debug!(index, %image, "slot updated");
            *slot = Some(image.clone());
        }
    }
}
