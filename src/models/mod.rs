//! Berth planning domain models.
//!
//! | Model | Role |
//! |-------|------|
//! | `RawShip` | Ship fields as entered by the user |
//! | `ShipRequest` | Validated ship with derived service time |
//! | `BerthState` | A berth and its next free time |
//! | `ScheduleEntry` | One ship placed on one berth |
//! | `Schedule` | All entries of a run plus rejected ships |

mod berth;
mod schedule;
mod ship;

pub use berth::{berth_label, BerthPool, BerthQueue, BerthState, BerthTracker};
pub use schedule::{Schedule, ScheduleEntry, ScheduleRow, DISPLAY_FORMAT};
pub use ship::{
    delta_to_hours, hours_to_delta, service_hours, RawShip, ShipRequest, MIN_SERVICE_HOURS,
};
