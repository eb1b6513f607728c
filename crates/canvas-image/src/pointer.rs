//! Tracking of the active contacts (mouse button, touches) of one surface.

use crate::geometry::Point;

pub type ContactId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerContact {
    pub id: ContactId,
    /// last known position, surface-local
    pub pos: Point,
}

/// Two-contact zoom produced by a single move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    /// new inter-contact distance over the previous one
    pub ratio: f64,
    /// midpoint of the two contacts after the move
    pub center: Point,
}

/// What one contact move means for the view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureDelta {
    /// `(previous - current)`, divided by the active-contact count when enabled.
    /// Positive values mean the pointer travelled left/up.
    pub pan_x: f64,
    pub pan_y: f64,
    pub pinch: Option<Pinch>,
}

#[derive(Debug, Clone)]
pub struct PointerSessionTracker {
    contacts: Vec<PointerContact>,
    /// distance between the two contacts at the last pinch step,
    /// only meaningful while exactly two contacts are active
    previous_distance: Option<f64>,
    divide_pan_by_contacts: bool,
}

impl PointerSessionTracker {
    pub fn new(divide_pan_by_contacts: bool) -> Self {
        Self {
            contacts: Vec::with_capacity(4),
            previous_distance: None,
            divide_pan_by_contacts,
        }
    }

    pub fn set_divide_pan_by_contacts(&mut self, divide: bool) {
        self.divide_pan_by_contacts = divide;
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contacts(&self) -> &[PointerContact] {
        &self.contacts
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn previous_distance(&self) -> Option<f64> {
        self.previous_distance
    }

    fn index_of(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }

    fn pair_distance(&self) -> Option<f64> {
        match self.contacts.as_slice() {
            [a, b] => Some(a.pos.distance(b.pos)),
            _ => None,
        }
    }

    fn reseed_distance(&mut self) {
        self.previous_distance = self.pair_distance();
    }

    /// Registers a contact. A second start for an id that is already active
    /// only moves it, so a duplicated down event cannot create a ghost contact.
    pub fn contact_start(&mut self, id: ContactId, pos: Point) {
        match self.index_of(id) {
            Some(index) => {
                log::trace!("contact {id} started twice, updating its position");
                self.contacts[index].pos = pos;
            }
            None => self.contacts.push(PointerContact { id, pos }),
        }
        self.reseed_distance();
    }

    /// Returns `None` for a contact that was never started (or already ended).
    pub fn contact_move(&mut self, id: ContactId, pos: Point) -> Option<GestureDelta> {
        let Some(index) = self.index_of(id) else {
            log::trace!("move for untracked contact {id} ignored");
            return None;
        };

        let divisor = if self.divide_pan_by_contacts {
            self.contacts.len() as f64
        } else {
            1.0
        };

        let previous = self.contacts[index].pos;
        let mut delta = GestureDelta {
            pan_x: (previous.x - pos.x) / divisor,
            pan_y: (previous.y - pos.y) / divisor,
            pinch: None,
        };
        self.contacts[index].pos = pos;

        if let [a, b] = self.contacts.as_slice() {
            let distance = a.pos.distance(b.pos);
            let ratio = match self.previous_distance {
                Some(previous) if previous > 0.0 && distance > 0.0 => distance / previous,
                _ => 1.0,
            };
            delta.pinch = Some(Pinch {
                ratio,
                center: a.pos.midpoint(b.pos),
            });
            self.previous_distance = Some(distance);
        }

        Some(delta)
    }

    /// Removes a contact; up, cancel and leave all end up here.
    /// Returns `false` when the id was not tracked.
    pub fn contact_end(&mut self, id: ContactId) -> bool {
        let Some(index) = self.index_of(id) else {
            log::trace!("end for untracked contact {id} ignored");
            return false;
        };
        self.contacts.swap_remove(index);
        self.reseed_distance();
        true
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
        self.previous_distance = None;
    }
}
