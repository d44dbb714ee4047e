use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use storm::{Column, Declaration, Model, Parameter, PersistenceEvents, Relation, Snapshot};

/// The `BICYCLES` table. Tracks changes.
#[derive(Debug, Default, Clone)]
pub struct Bicycle {
    pub name: Option<String>,
    pub frame: Option<String>,
    pub fork: Option<String>,
    pub garage: Option<i64>,
    pub snapshot: Snapshot,
}

impl Bicycle {
    pub fn new(name: &str, frame: &str, fork: &str) -> Bicycle {
        Bicycle {
            name: Some(name.to_string()),
            frame: Some(frame.to_string()),
            fork: Some(fork.to_string()),
            ..Bicycle::default()
        }
    }

    pub fn named(name: &str) -> Bicycle {
        Bicycle {
            name: Some(name.to_string()),
            ..Bicycle::default()
        }
    }

    pub fn in_garage(mut self, garage: i64) -> Bicycle {
        self.garage = Some(garage);
        self
    }
}

impl Model for Bicycle {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("BICYCLES", "sql")
            .column("name", |b| &b.name, |b| &mut b.name, Column::named("NAME").primary_key())
            .column("frame", |b| &b.frame, |b| &mut b.frame, Column::named("FRAME"))
            .column("fork", |b| &b.fork, |b| &mut b.fork, Column::named("FORK"))
            .column("garage", |b| &b.garage, |b| &mut b.garage, Column::named("GARAGE"))
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        Some(&self.snapshot)
    }

    fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        Some(&mut self.snapshot)
    }
}

/// The `PARTS` table. `origin` is filled in by the database on insert.
#[derive(Debug, Default)]
pub struct Part {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub origin: Option<String>,
}

impl Model for Part {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("PARTS", "sql")
            .column("id", |p| &p.id, |p| &mut p.id, Column::named("ID").primary_key())
            .column("name", |p| &p.name, |p| &mut p.name, Column::named("NAME"))
            .column(
                "origin",
                |p| &p.origin,
                |p| &mut p.origin,
                Column::named("ORIGIN").suppress(PersistenceEvents::INSERT),
            )
    }
}

/// Loaded through the `GARAGE_INFO` procedure, with the bicycles parked in
/// it.
#[derive(Debug, Default)]
pub struct Garage {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub bicycles: Vec<Arc<Bicycle>>,
}

impl Model for Garage {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("GARAGE_INFO", "procedure")
            .parameter("id", |g| &g.id, |g| &mut g.id, Parameter::input("GARAGE_ID"))
            .parameter("name", |g| &g.name, |g| &mut g.name, Parameter::output("GARAGE_NAME"))
            .relation_many(
                "bicycles",
                |g| &g.bicycles,
                |g| &mut g.bicycles,
                Relation::new("id", "garage"),
            )
    }
}

/// Handled by a custom `"depot"` binder; persists and deletes its bicycles
/// by cascade.
#[derive(Debug, Default)]
pub struct Depot {
    pub id: Option<i64>,
    pub bicycles: Vec<Arc<Bicycle>>,
    pub showcase: Option<Arc<Bicycle>>,
}

impl Model for Depot {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("DEPOT_INFO", "depot")
            .parameter("id", |d| &d.id, |d| &mut d.id, Parameter::input("DEPOT_ID"))
            .relation_many(
                "bicycles",
                |d| &d.bicycles,
                |d| &mut d.bicycles,
                Relation::new("id", "garage"),
            )
            .relation_one(
                "showcase",
                |d| &d.showcase,
                |d| &mut d.showcase,
                Relation::new("id", "garage"),
            )
    }
}

/// Rider and team refer to each other. Riders track changes.
#[derive(Debug, Default)]
pub struct Rider {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub team_id: Option<i64>,
    pub team: Option<Arc<Team>>,
    pub snapshot: Snapshot,
}

impl Model for Rider {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("RIDER_INFO", "procedure")
            .parameter("id", |r| &r.id, |r| &mut r.id, Parameter::input("RIDER_ID"))
            .parameter("name", |r| &r.name, |r| &mut r.name, Parameter::output("RIDER_NAME"))
            .parameter("team_id", |r| &r.team_id, |r| &mut r.team_id, Parameter::output("TEAM_ID"))
            .relation_one("team", |r| &r.team, |r| &mut r.team, Relation::new("team_id", "id"))
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        Some(&self.snapshot)
    }

    fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        Some(&mut self.snapshot)
    }
}

#[derive(Debug, Default)]
pub struct Team {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub captain_id: Option<i64>,
    pub captain: Option<Arc<Rider>>,
}

impl Model for Team {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("TEAM_INFO", "procedure")
            .parameter("id", |t| &t.id, |t| &mut t.id, Parameter::input("TEAM_ID"))
            .parameter("name", |t| &t.name, |t| &mut t.name, Parameter::output("TEAM_NAME"))
            .parameter(
                "captain_id",
                |t| &t.captain_id,
                |t| &mut t.captain_id,
                Parameter::output("CAPTAIN_ID"),
            )
            .relation_one(
                "captain",
                |t| &t.captain,
                |t| &mut t.captain,
                Relation::new("captain_id", "id"),
            )
    }
}

/// Two relations that may reach the same rider.
#[derive(Debug, Default)]
pub struct Club {
    pub id: Option<i64>,
    pub president_id: Option<i64>,
    pub treasurer_id: Option<i64>,
    pub president: Option<Arc<Rider>>,
    pub treasurer: Option<Arc<Rider>>,
}

impl Model for Club {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("CLUB_INFO", "procedure")
            .parameter("id", |c| &c.id, |c| &mut c.id, Parameter::input("CLUB_ID"))
            .parameter(
                "president_id",
                |c| &c.president_id,
                |c| &mut c.president_id,
                Parameter::output("PRESIDENT_ID"),
            )
            .parameter(
                "treasurer_id",
                |c| &c.treasurer_id,
                |c| &mut c.treasurer_id,
                Parameter::output("TREASURER_ID"),
            )
            .relation_one(
                "president",
                |c| &c.president,
                |c| &mut c.president,
                Relation::new("president_id", "id"),
            )
            .relation_one(
                "treasurer",
                |c| &c.treasurer,
                |c| &mut c.treasurer,
                Relation::new("treasurer_id", "id"),
            )
    }
}

/// The `ADJUST_PRICE` procedure: one parameter of each direction.
#[derive(Debug, Default)]
pub struct Quote {
    pub base: i64,
    pub amount: i64,
    pub label: Option<String>,
}

impl Model for Quote {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("ADJUST_PRICE", "procedure")
            .parameter("base", |q| &q.base, |q| &mut q.base, Parameter::input("BASE"))
            .parameter(
                "amount",
                |q| &q.amount,
                |q| &mut q.amount,
                Parameter::input_output("AMOUNT"),
            )
            .parameter("label", |q| &q.label, |q| &mut q.label, Parameter::output("LABEL"))
    }
}

/// Number of times [`Counted::declare`] ran.
pub static COUNTED_DECLARATIONS: AtomicUsize = AtomicUsize::new(0);

/// Counts its declarations.
#[derive(Debug, Default)]
pub struct Counted {
    pub name: Option<String>,
}

impl Model for Counted {
    fn declare() -> Declaration<Self> {
        COUNTED_DECLARATIONS.fetch_add(1, Ordering::SeqCst);
        Declaration::<Self>::table("BICYCLES", "sql").column(
            "name",
            |c| &c.name,
            |c| &mut c.name,
            Column::named("NAME").primary_key(),
        )
    }
}

/// A table mapping holding a parameter mapping.
#[derive(Debug, Default)]
pub struct Misplaced {
    pub name: Option<String>,
    pub frame: Option<String>,
}

impl Model for Misplaced {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("BICYCLES", "sql")
            .column("name", |m| &m.name, |m| &mut m.name, Column::named("NAME").primary_key())
            .parameter("frame", |m| &m.frame, |m| &mut m.frame, Parameter::input("FRAME"))
    }
}

/// Names a binder nobody registered.
#[derive(Debug, Default)]
pub struct Orphan {
    pub name: Option<String>,
}

impl Model for Orphan {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("BICYCLES", "nosuch").column(
            "name",
            |o| &o.name,
            |o| &mut o.name,
            Column::named("NAME").primary_key(),
        )
    }
}

/// Maps the text column `FRAME` to an integer.
#[derive(Debug, Default)]
pub struct Mistyped {
    pub name: Option<String>,
    pub frame: Option<i64>,
}

impl Model for Mistyped {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("BICYCLES", "sql")
            .column("name", |m| &m.name, |m| &mut m.name, Column::named("NAME").primary_key())
            .column("frame", |m| &m.frame, |m| &mut m.frame, Column::named("FRAME"))
    }
}

/// Maps a table that does not exist.
#[derive(Debug, Default)]
pub struct Unicycle {
    pub name: Option<String>,
}

impl Model for Unicycle {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("UNICYCLES", "sql").column(
            "name",
            |u| &u.name,
            |u| &mut u.name,
            Column::named("NAME").primary_key(),
        )
    }
}

/// Cannot be loaded.
#[derive(Debug, Default)]
pub struct Archived {
    pub name: Option<String>,
    pub frame: Option<String>,
}

impl Model for Archived {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("BICYCLES", "sql")
            .suppress(PersistenceEvents::LOAD | PersistenceEvents::DELETE)
            .column("name", |a| &a.name, |a| &mut a.name, Column::named("NAME").primary_key())
            .column("frame", |a| &a.frame, |a| &mut a.frame, Column::named("FRAME"))
    }
}

/// A bicycle whose garage is known to the type but not mapped.
#[derive(Debug, Default)]
pub struct ParkedBike {
    pub name: Option<String>,
    pub lot: Option<i64>,
}

impl Model for ParkedBike {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::table("BICYCLES", "sql")
            .column("name", |p| &p.name, |p| &mut p.name, Column::named("NAME").primary_key())
            .property("lot", |p| &p.lot, |p| &mut p.lot)
    }
}

/// Relates to bicycles through a property that no column maps.
#[derive(Debug, Default)]
pub struct Lot {
    pub id: Option<i64>,
    pub bikes: Vec<Arc<ParkedBike>>,
}

impl Model for Lot {
    fn declare() -> Declaration<Self> {
        Declaration::<Self>::procedure("GARAGE_INFO", "procedure")
            .parameter("id", |l| &l.id, |l| &mut l.id, Parameter::input("GARAGE_ID"))
            .relation_many("bikes", |l| &l.bikes, |l| &mut l.bikes, Relation::new("id", "lot"))
    }
}
