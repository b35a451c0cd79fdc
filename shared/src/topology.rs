use serde::Deserialize;

/// Land-polygon basemap, a GeoJSON FeatureCollection pre-converted from
/// the upstream world-atlas topology. Fetched once per process lifetime
/// and cached by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldTopology {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

/// Only the geometry kinds the land basemap actually contains.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl WorldTopology {
    /// Iterate every ring (outer and holes) of every feature as lon/lat
    /// vertex lists, ready for path tracing.
    pub fn rings(&self) -> impl Iterator<Item = &Vec<[f64; 2]>> {
        self.features
            .iter()
            .flat_map(|f| -> Box<dyn Iterator<Item = &Vec<[f64; 2]>>> {
                match &f.geometry {
                    Geometry::Polygon(rings) => Box::new(rings.iter()),
                    Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"name": "islet"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 10.0]]],
                            [[[20.0, 20.0], [21.0, 20.0], [21.0, 21.0], [20.0, 20.0]]]
                        ]
                    }
                }
            ]
        }"#;

        let topo: WorldTopology = serde_json::from_str(raw).unwrap();
        assert_eq!(topo.features.len(), 2);
        let rings: Vec<_> = topo.rings().collect();
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[0][1], [1.0, 0.0]);
        assert_eq!(rings[2][0], [20.0, 20.0]);
    }

    #[test]
    fn polygon_holes_are_included_as_rings() {
        let raw = r#"{
            "features": [{
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]],
                        [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]
                    ]
                }
            }]
        }"#;

        let topo: WorldTopology = serde_json::from_str(raw).unwrap();
        assert_eq!(topo.rings().count(), 2);
    }
}
