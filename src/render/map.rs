//! Map rendering of composite frames with `plotters`.
//!
//! Each call to [`MapRenderer::render`] owns its drawing area for the
//! duration of the call: the figure is acquired, drawn, presented and dropped
//! per rendered item, so no plotting state survives between loop iterations.

use crate::composite::grid::CompositeGrid;
use crate::render::colormap::RainfallScale;
use crate::render::error::RenderError;
use crate::render::projection::{
    germany_view, wgs84_to_mercator, GridGeometry, MercatorPoint, ViewBounds,
};
use log::info;
use plotters::prelude::*;
use std::path::Path;

/// Country/lake outlines parsed from the static vector boundary file
/// (GeoJSON FeatureCollection with Polygon or MultiPolygon geometries),
/// reprojected to Web Mercator once at load time.
#[derive(Debug, Clone)]
pub struct Boundary {
    rings: Vec<Vec<MercatorPoint>>,
}

impl Boundary {
    pub fn from_geojson(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::BoundaryRead(path.to_path_buf(), e))?;
        let root: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| RenderError::BoundaryParse(path.to_path_buf(), e))?;

        let mut rings = Vec::new();
        let features = root
            .get("features")
            .and_then(|f| f.as_array())
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        for feature in features {
            let Some(geometry) = feature.get("geometry") else {
                continue;
            };
            match geometry.get("type").and_then(|t| t.as_str()) {
                Some("Polygon") => {
                    if let Some(polygon) = geometry.get("coordinates") {
                        collect_polygon_rings(polygon, &mut rings);
                    }
                }
                Some("MultiPolygon") => {
                    let polygons = geometry
                        .get("coordinates")
                        .and_then(|c| c.as_array())
                        .map(|v| v.as_slice())
                        .unwrap_or(&[]);
                    for polygon in polygons {
                        collect_polygon_rings(polygon, &mut rings);
                    }
                }
                _ => continue,
            }
        }

        if rings.is_empty() {
            return Err(RenderError::BoundaryEmpty(path.to_path_buf()));
        }
        Ok(Boundary { rings })
    }

    pub fn rings(&self) -> &[Vec<MercatorPoint>] {
        &self.rings
    }
}

fn collect_polygon_rings(polygon: &serde_json::Value, rings: &mut Vec<Vec<MercatorPoint>>) {
    let Some(ring_values) = polygon.as_array() else {
        return;
    };
    for ring_value in ring_values {
        let Some(points) = ring_value.as_array() else {
            continue;
        };
        let ring: Vec<MercatorPoint> = points
            .iter()
            .filter_map(|p| {
                let lon = p.get(0)?.as_f64()?;
                let lat = p.get(1)?.as_f64()?;
                Some(wgs84_to_mercator(lat, lon))
            })
            .collect();
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }
}

/// Presentation parameters for one map figure.
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub width: u32,
    pub height: u32,
    pub scale: RainfallScale,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 1280,
            scale: RainfallScale::default(),
        }
    }
}

pub struct MapRenderer {
    boundary: Boundary,
    style: MapStyle,
    view: ViewBounds,
}

impl MapRenderer {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            style: MapStyle::default(),
            view: germany_view(),
        }
    }

    pub fn with_style(boundary: Boundary, style: MapStyle) -> Self {
        Self {
            boundary,
            style,
            view: germany_view(),
        }
    }

    /// Renders one composite frame to `path`.
    ///
    /// Backdrop rings in translucent gray, one filled quad per wet grid cell,
    /// a caption with product label and timestamp, axes hidden, and a
    /// colorbar strip along the lower edge.
    pub fn render(&self, grid: &CompositeGrid, path: &Path) -> Result<(), RenderError> {
        info!(
            "Rendering {} frame for {} to {:?}",
            grid.product_label, grid.timestamp, path
        );
        let draw_err = |e: String| RenderError::Draw {
            path: path.to_path_buf(),
            message: e,
        };

        let area =
            BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        area.fill(&WHITE).map_err(|e| draw_err(e.to_string()))?;

        let caption = format!(
            "{} composite  {}",
            grid.product_label,
            grid.timestamp.format("%Y-%m-%d %H:%M UTC")
        );
        let mut chart = ChartBuilder::on(&area)
            .caption(caption, ("sans-serif", 36))
            .margin(12)
            .build_cartesian_2d(
                self.view.x_min..self.view.x_max,
                self.view.y_min..self.view.y_max,
            )
            .map_err(|e| draw_err(e.to_string()))?;

        chart
            .draw_series(self.boundary.rings.iter().map(|ring| {
                let points: Vec<(f64, f64)> = ring.iter().map(|p| (p.x, p.y)).collect();
                Polygon::new(points, RGBAColor(128, 128, 128, 0.25).filled())
            }))
            .map_err(|e| draw_err(e.to_string()))?;

        let cells = visible_cells(grid, &self.style.scale, &self.view);
        chart
            .draw_series(cells.into_iter().map(|(corners, color)| {
                let points: Vec<(f64, f64)> = corners.iter().map(|p| (p.x, p.y)).collect();
                Polygon::new(points, RGBAColor(color.r, color.g, color.b, color.a).filled())
            }))
            .map_err(|e| draw_err(e.to_string()))?;

        self.draw_colorbar(&area)
            .map_err(|e| draw_err(e.to_string()))?;

        area.present().map_err(|e| draw_err(e.to_string()))?;
        Ok(())
    }

    /// Horizontal colorbar along the lower edge, labeled in mm/h.
    fn draw_colorbar<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<(), String> {
        const SEGMENTS: i32 = 40;
        let bar_width = (self.style.width as i32) / 2;
        let segment = bar_width / SEGMENTS;
        let x0 = (self.style.width as i32 - bar_width) / 2;
        let y0 = self.style.height as i32 - 48;
        let y1 = self.style.height as i32 - 28;

        for i in 0..SEGMENTS {
            let value = self.style.scale.vmax() * (i as f64 + 0.5) / SEGMENTS as f64;
            let c = self.style.scale.color(value);
            area.draw(&Rectangle::new(
                [(x0 + i * segment, y0), (x0 + (i + 1) * segment, y1)],
                RGBAColor(c.r, c.g, c.b, c.a).filled(),
            ))
            .map_err(|e| e.to_string())?;
        }

        for (fraction, label) in [(0.0, "0"), (0.5, "25"), (1.0, "50 mm/h")] {
            let x = x0 + (bar_width as f64 * fraction) as i32;
            area.draw(&Text::new(label, (x, y1 + 4), ("sans-serif", 18)))
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// Collects the drawable cells of a grid: wet enough to be visible and at
/// least partially inside the view frame.
fn visible_cells(
    grid: &CompositeGrid,
    scale: &RainfallScale,
    view: &ViewBounds,
) -> Vec<([MercatorPoint; 4], crate::render::colormap::Rgba)> {
    let geometry = GridGeometry::new(grid.width, grid.height);
    let mut cells = Vec::new();
    for row in 0..grid.height {
        for col in 0..grid.width {
            let value = grid.value_at(col, row) as f64;
            if !scale.is_visible(value) {
                continue;
            }
            let corners = geometry.cell_corners(col, row);
            let inside = corners.iter().any(|p| {
                p.x >= view.x_min && p.x <= view.x_max && p.y >= view.y_min && p.y <= view.y_max
            });
            if !inside {
                continue;
            }
            cells.push((corners, scale.color(value)));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Germany"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[6.0, 47.0], [14.0, 47.0], [14.0, 55.0], [6.0, 55.0], [6.0, 47.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Islands"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[7.0, 53.5], [7.5, 53.5], [7.5, 53.8], [7.0, 53.5]]],
                        [[[8.0, 54.0], [8.5, 54.0], [8.5, 54.4], [8.0, 54.0]]]
                    ]
                }
            }
        ]
    }"#;

    fn write_boundary(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn boundary_parses_polygons_and_multipolygons() {
        let file = write_boundary(GEOJSON);
        let boundary = Boundary::from_geojson(file.path()).unwrap();
        assert_eq!(boundary.rings().len(), 3);
        // Coordinates are reprojected out of degree space.
        assert!(boundary.rings()[0][0].x.abs() > 1000.0);
    }

    #[test]
    fn boundary_without_rings_is_an_error() {
        let file = write_boundary(r#"{"type": "FeatureCollection", "features": []}"#);
        assert!(matches!(
            Boundary::from_geojson(file.path()),
            Err(RenderError::BoundaryEmpty(_))
        ));
    }

    #[test]
    fn dry_grid_yields_no_visible_cells() {
        let ts = Utc.with_ymd_and_hms(2023, 9, 4, 12, 0, 0).unwrap();
        let grid = CompositeGrid::new("RY", ts, 900, 900, vec![0.0; 900 * 900]);
        let cells = visible_cells(&grid, &RainfallScale::default(), &germany_view());
        assert!(cells.is_empty());
    }

    #[test]
    fn wet_cell_in_the_domain_interior_is_drawn() {
        let ts = Utc.with_ymd_and_hms(2023, 9, 4, 12, 0, 0).unwrap();
        let mut values = vec![0.0; 900 * 900];
        values[450 * 900 + 450] = 5.0;
        let grid = CompositeGrid::new("RY", ts, 900, 900, values);
        let cells = visible_cells(&grid, &RainfallScale::default(), &germany_view());
        assert_eq!(cells.len(), 1);
        assert!(cells[0].1.a > 0.9);
    }
}
