pub use crate::arrivals::{Arrival, Arrivals, Designation, Route, Stop, get_arrivals};
pub use crate::config::Config;
pub use crate::error::{IdKind, Problem, QueryError};
pub use crate::live::{Delivery, Phase, QueryController, Session, Submission};
pub use crate::query::{RouteFilter, StopQuery};
pub use crate::shared::geo::{Coordinate, Distance, DistanceAway};
pub use crate::trimet::{TriMetClient, UpstreamClient};
