//! Turns egui's raw events into surface events for the gesture engine.

use canvas_image::{ContactId, InputEvent, Point};
use eframe::egui;

/// Contact id used for the primary mouse button, out of the range touch ids use.
pub const MOUSE_CONTACT: ContactId = ContactId::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Input(InputEvent),
    /// trackpad pinch reported by the platform as a ready-made factor
    Zoom { ratio: f64, anchor: Point },
}

#[derive(Default)]
pub struct InputRouter {
    mouse_down: bool,
    touches: Vec<ContactId>,
    /// last pointer position in screen coordinates
    hover: Option<egui::Pos2>,
}

fn local(pos: egui::Pos2, surface: egui::Rect) -> Point {
    Point::new((pos.x - surface.min.x) as f64, (pos.y - surface.min.y) as f64)
}

impl InputRouter {
    pub fn active_contacts(&self) -> usize {
        self.touches.len() + usize::from(self.mouse_down)
    }

    /// Translates one frame worth of events. `surface` is the screen rect of
    /// the image panel; contacts only start inside it but are followed outside.
    /// `reachable` tells whether the panel is the topmost layer at a screen
    /// position, so presses and scrolls over floating windows stay with them.
    pub fn translate(
        &mut self,
        events: &[egui::Event],
        surface: egui::Rect,
        reachable: impl Fn(egui::Pos2) -> bool,
    ) -> Vec<Command> {
        let mut commands = Vec::new();
        let accepts = |pos: egui::Pos2| surface.contains(pos) && reachable(pos);

        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    let starts = accepts(*pos);
                    self.on_touch(id.0, *phase, *pos, starts, surface, &mut commands)
                }

                // platforms mirror the first touch as mouse events
                egui::Event::PointerButton { .. } | egui::Event::PointerMoved(_)
                    if !self.touches.is_empty() => {}

                egui::Event::PointerMoved(pos) => {
                    self.hover = Some(*pos);
                    if self.mouse_down {
                        commands.push(Command::Input(InputEvent::ContactMove {
                            id: MOUSE_CONTACT,
                            pos: local(*pos, surface),
                        }));
                    }
                }

                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    self.hover = Some(*pos);
                    if *pressed && !self.mouse_down && accepts(*pos) {
                        self.mouse_down = true;
                        commands.push(Command::Input(InputEvent::ContactStart {
                            id: MOUSE_CONTACT,
                            pos: local(*pos, surface),
                        }));
                    } else if !*pressed && self.mouse_down {
                        self.mouse_down = false;
                        commands.push(Command::Input(InputEvent::ContactEnd { id: MOUSE_CONTACT }));
                    }
                }

                egui::Event::PointerGone => {
                    self.hover = None;
                    if self.mouse_down {
                        self.mouse_down = false;
                        commands.push(Command::Input(InputEvent::ContactLeave {
                            id: MOUSE_CONTACT,
                        }));
                    }
                }

                egui::Event::MouseWheel { delta, .. } => {
                    if let Some(pos) = self.hover.filter(|pos| accepts(*pos)) {
                        // egui reports wheel-up as positive, the engine wants it negative
                        commands.push(Command::Input(InputEvent::Wheel {
                            delta_y: -delta.y as f64,
                            pos: local(pos, surface),
                        }));
                    }
                }

                egui::Event::Zoom(factor) => {
                    let anchor = match self.hover {
                        Some(pos) if surface.contains(pos) && !reachable(pos) => continue,
                        Some(pos) if surface.contains(pos) => pos,
                        _ => surface.center(),
                    };
                    commands.push(Command::Zoom {
                        ratio: *factor as f64,
                        anchor: local(anchor, surface),
                    });
                }

                egui::Event::WindowFocused(false) => self.cancel_all(&mut commands),

                _ => {}
            }
        }

        commands
    }

    fn on_touch(
        &mut self,
        id: ContactId,
        phase: egui::TouchPhase,
        pos: egui::Pos2,
        starts: bool,
        surface: egui::Rect,
        commands: &mut Vec<Command>,
    ) {
        let pos_local = local(pos, surface);
        let tracked = self.touches.contains(&id);

        match phase {
            egui::TouchPhase::Start if !tracked && starts => {
                self.touches.push(id);
                commands.push(Command::Input(InputEvent::ContactStart { id, pos: pos_local }));
            }
            egui::TouchPhase::Move if tracked => {
                commands.push(Command::Input(InputEvent::ContactMove { id, pos: pos_local }));
            }
            egui::TouchPhase::End if tracked => {
                self.touches.retain(|touch| *touch != id);
                commands.push(Command::Input(InputEvent::ContactEnd { id }));
            }
            egui::TouchPhase::Cancel if tracked => {
                self.touches.retain(|touch| *touch != id);
                commands.push(Command::Input(InputEvent::ContactCancel { id }));
            }
            _ => log::trace!("touch {id} {phase:?} outside of the image panel ignored"),
        }
    }

    fn cancel_all(&mut self, commands: &mut Vec<Command>) {
        if self.mouse_down {
            self.mouse_down = false;
            commands.push(Command::Input(InputEvent::ContactCancel { id: MOUSE_CONTACT }));
        }
        for id in self.touches.drain(..) {
            commands.push(Command::Input(InputEvent::ContactCancel { id }));
        }
    }
}
