use board_proto::{Decal, GameState, Terrain, Unit};

/// Live mirror of the backend's entity tables.
///
/// Collections keep store order: inserts append, updates replace in place,
/// so a row's paint position is decided by when it first appeared. Lookups
/// are linear scans; the board holds tens of entities, not thousands.
#[derive(Debug, Default)]
pub struct EntityStore {
    units: Vec<Unit>,
    terrain: Vec<Terrain>,
    underlays: Vec<Decal>,
    overlays: Vec<Decal>,
}

trait Keyed {
    fn key(&self) -> u64;
}

impl Keyed for Unit {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Keyed for Terrain {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Keyed for Decal {
    fn key(&self) -> u64 {
        self.id
    }
}

fn upsert<T: Keyed>(rows: &mut Vec<T>, row: T) {
    match rows.iter_mut().find(|existing| existing.key() == row.key()) {
        Some(existing) => *existing = row,
        None => rows.push(row),
    }
}

/// Removal of an id that was never seen (or already deleted) is a no-op,
/// not an error; delete notifications may race local expectations.
fn remove<T: Keyed>(rows: &mut Vec<T>, id: u64) {
    rows.retain(|row| row.key() != id);
}

impl EntityStore {
    pub fn upsert_unit(&mut self, unit: Unit) {
        upsert(&mut self.units, unit);
    }

    pub fn remove_unit(&mut self, id: u64) {
        remove(&mut self.units, id);
    }

    pub fn upsert_terrain(&mut self, terrain: Terrain) {
        upsert(&mut self.terrain, terrain);
    }

    pub fn remove_terrain(&mut self, id: u64) {
        remove(&mut self.terrain, id);
    }

    pub fn upsert_underlay(&mut self, decal: Decal) {
        upsert(&mut self.underlays, decal);
    }

    pub fn remove_underlay(&mut self, id: u64) {
        remove(&mut self.underlays, id);
    }

    pub fn upsert_overlay(&mut self, decal: Decal) {
        upsert(&mut self.overlays, decal);
    }

    pub fn remove_overlay(&mut self, id: u64) {
        remove(&mut self.overlays, id);
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn terrain(&self) -> &[Terrain] {
        &self.terrain
    }

    pub fn underlays(&self) -> &[Decal] {
        &self.underlays
    }

    pub fn overlays(&self) -> &[Decal] {
        &self.overlays
    }

    /// Clone the four collections into a snapshot aggregate.
    pub fn capture(&self) -> GameState {
        GameState {
            units: self.units.clone(),
            terrain: self.terrain.clone(),
            underlays: self.underlays.clone(),
            overlays: self.overlays.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_proto::{Color, Point, ShapeDef};

    fn unit(id: u64, x: f32) -> Unit {
        Unit {
            id,
            shape: ShapeDef::circle(Point::new(x, 50.0), 28.0),
            color: Color::BLUE,
        }
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = EntityStore::default();
        store.upsert_unit(unit(1, 10.0));
        store.upsert_unit(unit(2, 20.0));
        store.upsert_unit(unit(1, 30.0));
        let xs: Vec<f32> = store
            .units()
            .iter()
            .map(|u| u.shape.center().unwrap().x)
            .collect();
        // Id 1 keeps its slot at the front of the paint order.
        assert_eq!(xs, vec![30.0, 20.0]);
    }

    #[test]
    fn removing_an_unknown_id_is_a_no_op() {
        let mut store = EntityStore::default();
        store.upsert_unit(unit(1, 10.0));
        store.remove_unit(99);
        assert_eq!(store.units().len(), 1);
    }

    #[test]
    fn captured_snapshots_do_not_track_later_mutations() {
        let mut store = EntityStore::default();
        store.upsert_unit(unit(1, 10.0));
        let snapshot = store.capture();
        store.upsert_unit(unit(1, 99.0));
        store.remove_unit(1);
        assert_eq!(snapshot.units.len(), 1);
        assert_eq!(snapshot.units[0].shape.center().unwrap().x, 10.0);
    }
}
