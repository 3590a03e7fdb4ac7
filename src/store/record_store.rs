//! The in-memory record store and its spatial index.

use crate::config::SpatialPolicy;
use crate::error::WeatherOddsError;
use crate::store::error::LoadError;
use crate::types::location::LatLon;
use crate::types::report::ResolvedSeries;
use crate::types::series::RecordSeries;
use haversine::{distance, Location as HaversineLocation, Units};
use log::{debug, warn};
use ordered_float::OrderedFloat;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

/// Coordinates closer than this, in degrees on both axes, count as the same point.
const EXACT_MATCH_EPSILON_DEG: f64 = 1e-6;
/// A resolved series closer than this is reported as sitting on the query point.
const SAME_POINT_KM: f64 = 0.001;
/// Earth radius used by `haversine::distance` for kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A location's history as stored in the index.
#[derive(Debug, Clone)]
pub struct SeriesEntry {
    pub id: String,
    pub location: LatLon,
    pub series: Arc<RecordSeries>,
}

/// Implementation required by `rstar` to treat a `SeriesEntry` as an object within an R-Tree.
impl RTreeObject for SeriesEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.0, self.location.1])
    }
}

/// Squared planar distance in degrees. Only used by the exact-point lookup;
/// reported distances are haversine.
impl PointDistance for SeriesEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.0 - point[0];
        let dy = self.location.1 - point[1];
        dx * dx + dy * dy
    }
}

fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.0,
            longitude: a.1,
        },
        HaversineLocation {
            latitude: b.0,
            longitude: b.1,
        },
        Units::Kilometers,
    )
}

// Heap entry ordered by distance only
struct Candidate<'a> {
    distance_km: OrderedFloat<f64>,
    entry: &'a SeriesEntry,
}
impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.distance_km == other.distance_km
    }
}
impl Eq for Candidate<'_> {}
impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_km
            .cmp(&other.distance_km)
            .then_with(|| self.entry.id.cmp(&other.entry.id))
    }
}

/// A series found for a query point.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    pub entry: &'a SeriesEntry,
    pub distance_km: f64,
}

impl Lookup<'_> {
    pub fn series(&self) -> &RecordSeries {
        &self.entry.series
    }

    /// Whether the series sits on the query point rather than near it.
    pub fn is_exact(&self) -> bool {
        self.distance_km < SAME_POINT_KM
    }

    pub fn resolved(&self) -> ResolvedSeries {
        ResolvedSeries {
            id: self.entry.id.clone(),
            location: self.entry.location,
            distance_km: self.distance_km,
        }
    }
}

/// Read-only collection of record series indexed by location.
///
/// Built once through [`RecordStoreBuilder`]; lookups never mutate it, so one
/// store can serve any number of concurrent queries.
#[derive(Debug, Default)]
pub struct RecordStore {
    rtree: RTree<SeriesEntry>,
}

impl RecordStore {
    pub fn builder() -> RecordStoreBuilder {
        RecordStoreBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesEntry> {
        self.rtree.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SeriesEntry> {
        self.rtree.iter().find(|e| e.id == id)
    }

    /// Resolves the series answering queries at `location` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherOddsError::LocationNotFound`] when no series qualifies.
    pub fn lookup(&self, location: LatLon, policy: SpatialPolicy) -> Result<Lookup<'_>, WeatherOddsError> {
        let not_found = || WeatherOddsError::LocationNotFound {
            lat: location.0,
            lon: location.1,
        };
        match policy {
            SpatialPolicy::Strict => {
                let entry = self
                    .rtree
                    .nearest_neighbor(&[location.0, location.1])
                    .filter(|e| {
                        (e.location.0 - location.0).abs() <= EXACT_MATCH_EPSILON_DEG
                            && (e.location.1 - location.1).abs() <= EXACT_MATCH_EPSILON_DEG
                    })
                    .ok_or_else(not_found)?;
                Ok(Lookup {
                    entry,
                    distance_km: haversine_km(location, entry.location),
                })
            }
            SpatialPolicy::Nearest { max_distance_km } => {
                let (entry, distance_km) = self
                    .find_nearby(location, 1, max_distance_km)
                    .into_iter()
                    .next()
                    .ok_or_else(not_found)?;
                let lookup = Lookup { entry, distance_km };
                if !lookup.is_exact() {
                    debug!(
                        "No series at ({location}); using '{}' {:.1} km away",
                        entry.id, distance_km
                    );
                }
                Ok(lookup)
            }
        }
    }

    /// Up to `limit` series within `max_distance_km`, closest first.
    ///
    /// Candidates come from the lat/lon boxes that bound the search circle,
    /// split at the antimeridian, so every series in range is ranked by its
    /// haversine distance.
    pub fn find_nearby(
        &self,
        location: LatLon,
        limit: usize,
        max_distance_km: f64,
    ) -> Vec<(&SeriesEntry, f64)> {
        if limit == 0 || !(max_distance_km >= 0.0) {
            return vec![];
        }
        let mut heap: BinaryHeap<Candidate<'_>> = BinaryHeap::with_capacity(limit + 1);

        for envelope in search_envelopes(location, max_distance_km) {
            for entry in self.rtree.locate_in_envelope_intersecting(&envelope) {
                let dist_km = haversine_km(location, entry.location);
                if dist_km > max_distance_km {
                    continue;
                }
                heap.push(Candidate {
                    distance_km: OrderedFloat(dist_km),
                    entry,
                });
                if heap.len() > limit {
                    heap.pop(); // drop the farthest
                }
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.entry, c.distance_km.into_inner()))
            .collect()
    }
}

/// Lat/lon boxes covering every point within `radius_km` of `center`.
///
/// The longitude span is widened to the full circle when the search circle
/// reaches a pole, and split in two when it crosses ±180°.
fn search_envelopes(center: LatLon, radius_km: f64) -> Vec<AABB<[f64; 2]>> {
    // Slight padding keeps points on the rim inside despite rounding.
    let angle_deg = (radius_km / EARTH_RADIUS_KM).to_degrees() * 1.000_001 + 1e-9;
    let min_lat = (center.0 - angle_deg).max(-90.0);
    let max_lat = (center.0 + angle_deg).min(90.0);
    let full = || vec![AABB::from_corners([min_lat, -180.0], [max_lat, 180.0])];

    if angle_deg >= 90.0 || max_lat >= 90.0 || min_lat <= -90.0 {
        return full();
    }
    let ratio = angle_deg.to_radians().sin() / center.0.to_radians().cos();
    if !(ratio < 1.0) {
        return full();
    }
    let half_span = ratio.asin().to_degrees() * 1.000_001 + 1e-9;
    if half_span >= 180.0 {
        return full();
    }

    let west = center.1 - half_span;
    let east = center.1 + half_span;
    let mut envelopes = vec![AABB::from_corners(
        [min_lat, west.max(-180.0)],
        [max_lat, east.min(180.0)],
    )];
    if west < -180.0 {
        envelopes.push(AABB::from_corners([min_lat, west + 360.0], [max_lat, 180.0]));
    }
    if east > 180.0 {
        envelopes.push(AABB::from_corners([min_lat, -180.0], [max_lat, east - 360.0]));
    }
    envelopes
}

/// Collects series before indexing them into a [`RecordStore`].
#[derive(Debug, Default)]
pub struct RecordStoreBuilder {
    entries: Vec<SeriesEntry>,
    ids: HashSet<String>,
}

impl RecordStoreBuilder {
    /// Adds a series under a unique id.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateSeries`] for a reused id and
    /// [`LoadError::InvalidLocation`] for out-of-range coordinates.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        location: LatLon,
        series: RecordSeries,
    ) -> Result<&mut Self, LoadError> {
        let id = id.into();
        if location.validate().is_err() {
            return Err(LoadError::InvalidLocation {
                id,
                lat: location.0,
                lon: location.1,
            });
        }
        if !self.ids.insert(id.clone()) {
            return Err(LoadError::DuplicateSeries(id));
        }
        self.entries.push(SeriesEntry {
            id,
            location,
            series: Arc::new(series),
        });
        Ok(self)
    }

    /// Indexes the collected series. Series without records are dropped, so a
    /// location with no data is never found.
    pub fn build(self) -> RecordStore {
        let entries: Vec<SeriesEntry> = self
            .entries
            .into_iter()
            .filter(|e| {
                if e.series.is_empty() {
                    warn!("Series '{}' has no records; leaving it out of the store", e.id);
                    return false;
                }
                true
            })
            .collect();
        RecordStore {
            rtree: RTree::bulk_load(entries),
        }
    }
}
