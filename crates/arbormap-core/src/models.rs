pub mod filter;
pub mod poi;
pub mod position;
pub mod tree;

pub use filter::{BoundInput, DiameterBound, FilterParameters};
pub use poi::{PoiId, PointOfInterest};
pub use position::{Distance, DistanceUnit, GeoPosition, Pixel};
pub use tree::{Dataset, RecordId, TreeRecord};
