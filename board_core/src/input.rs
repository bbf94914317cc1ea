use board_proto::{Point, ReducerRequest, Unit};

/// Pointer gesture phases. Mouse and touch sources are reduced to this
/// one vocabulary, in board-relative coordinates, before they get here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pos: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, pos: Point) -> Self {
        Self { phase, pos }
    }
}

/// Drag lifecycle, independent of how events are bound.
///
/// `grab` is the offset from the unit's center to where the pointer went
/// down, so the piece does not jump under the cursor on the first move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Selecting {
        unit: u64,
        grab: Point,
    },
    Dragging {
        unit: u64,
        grab: Point,
    },
}

/// Topmost unit whose hit-circle contains `pos`. The hit boundary is
/// inclusive: a pointer exactly `size / 2` from the center still selects.
/// Units missing their center or size are not hittable.
pub fn hit_unit(units: &[Unit], pos: Point) -> Option<&Unit> {
    units.iter().rev().find(|unit| {
        match (unit.shape.center(), unit.shape.hit_radius()) {
            (Some(center), Some(radius)) => pos.distance(center) <= radius,
            _ => false,
        }
    })
}

/// Advance the drag machine by one pointer event.
///
/// Emits at most one reducer request; the local mirror is never touched.
/// The authoritative position comes back as a table update, which keeps
/// every client converged on what the server accepted.
pub fn transition(
    state: DragState,
    event: PointerEvent,
    units: &[Unit],
) -> (DragState, Option<ReducerRequest>) {
    match event.phase {
        PointerPhase::Down => match hit_unit(units, event.pos) {
            Some(unit) => {
                let center = unit.shape.center().unwrap_or(event.pos);
                (
                    DragState::Selecting {
                        unit: unit.id,
                        grab: event.pos - center,
                    },
                    None,
                )
            }
            None => (DragState::Idle, None),
        },
        PointerPhase::Move => match state {
            DragState::Selecting { unit, grab } | DragState::Dragging { unit, grab } => {
                let target = event.pos - grab;
                (
                    DragState::Dragging { unit, grab },
                    Some(ReducerRequest::MoveUnit {
                        id: unit,
                        x: target.x,
                        y: target.y,
                    }),
                )
            }
            DragState::Idle => (DragState::Idle, None),
        },
        PointerPhase::Up => (DragState::Idle, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_proto::{Color, ShapeDef};

    fn unit(id: u64, x: f32, y: f32, size: f32) -> Unit {
        Unit {
            id,
            shape: ShapeDef::circle(Point::new(x, y), size),
            color: Color::BLUE,
        }
    }

    #[test]
    fn hit_boundary_is_inclusive() {
        let units = [unit(1, 100.0, 100.0, 28.0)];
        assert!(hit_unit(&units, Point::new(114.0, 100.0)).is_some());
        assert!(hit_unit(&units, Point::new(114.01, 100.0)).is_none());
    }

    #[test]
    fn overlapping_units_resolve_to_the_topmost() {
        let units = [unit(1, 100.0, 100.0, 28.0), unit(2, 104.0, 100.0, 28.0)];
        let hit = hit_unit(&units, Point::new(102.0, 100.0)).unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn drag_emits_absolute_moves_offset_by_the_grab_point() {
        let units = [unit(5, 100.0, 100.0, 28.0)];
        let (state, request) = transition(
            DragState::Idle,
            PointerEvent::new(PointerPhase::Down, Point::new(110.0, 100.0)),
            &units,
        );
        assert_eq!(
            state,
            DragState::Selecting {
                unit: 5,
                grab: Point::new(10.0, 0.0)
            }
        );
        assert_eq!(request, None);

        let (state, request) = transition(
            state,
            PointerEvent::new(PointerPhase::Move, Point::new(150.0, 120.0)),
            &units,
        );
        assert!(matches!(state, DragState::Dragging { unit: 5, .. }));
        assert_eq!(
            request,
            Some(ReducerRequest::MoveUnit {
                id: 5,
                x: 140.0,
                y: 120.0
            })
        );

        let (state, request) = transition(
            state,
            PointerEvent::new(PointerPhase::Up, Point::new(150.0, 120.0)),
            &units,
        );
        assert_eq!(state, DragState::Idle);
        assert_eq!(request, None);
    }

    #[test]
    fn moves_with_nothing_selected_stay_idle() {
        let (state, request) = transition(
            DragState::Idle,
            PointerEvent::new(PointerPhase::Move, Point::new(10.0, 10.0)),
            &[],
        );
        assert_eq!(state, DragState::Idle);
        assert_eq!(request, None);
    }
}
