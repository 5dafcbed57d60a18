use crate::geo::LatLng;

/// Axis-aligned geographic bounding box (south-west / north-east corners).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        LatLngBounds {
            south_west,
            north_east,
        }
    }

    /// Smallest box containing every finite point, or `None` if there is none.
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut out: Option<LatLngBounds> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            match &mut out {
                None => out = Some(LatLngBounds::new(p, p)),
                Some(b) => b.extend(p),
            }
        }
        out
    }

    pub fn extend(&mut self, p: LatLng) {
        if !p.is_finite() {
            return;
        }
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// Grows the box by `ratio` of its extent on every side.
    pub fn pad(&self, ratio: f64) -> Self {
        let dlat = (self.north_east.lat - self.south_west.lat) * ratio;
        let dlng = (self.north_east.lng - self.south_west.lng) * ratio;
        LatLngBounds::new(
            LatLng::new(self.south_west.lat - dlat, self.south_west.lng - dlng),
            LatLng::new(self.north_east.lat + dlat, self.north_east.lng + dlng),
        )
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lng + self.north_east.lng) * 0.5,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }
}
