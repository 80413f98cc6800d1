//! Conical nozzle contour.
//!
//! The wall is built from seven control points, upstream to downstream:
//! injector face, chamber fillet start, chamber fillet end, convergent line
//! end, throat, divergent arc end and exit. The throat sits at `x = 0`, the
//! chamber at negative `x`.

use crate::error::{EngineError, EngineResult, positive};
use crate::performance::EnginePerformance;
use ps_core::ensure_open_interval;
use ps_core::units::{Angle, Length, deg, m};
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Sampling refuses to produce more points than this.
pub const MAX_CONTOUR_SAMPLES: usize = 2_000_000;

/// Fillet radii and wall angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourSpec {
    /// Fillet between the chamber wall and the convergent line
    pub chamber_fillet_radius: Length,
    /// Arc joining the convergent line to the throat
    pub upstream_throat_radius: Length,
    /// Arc leaving the throat into the divergent line
    pub downstream_throat_radius: Length,
    pub convergence_angle: Angle,
    pub divergence_angle: Angle,
}

impl Default for ContourSpec {
    fn default() -> Self {
        Self {
            chamber_fillet_radius: m(0.05),
            upstream_throat_radius: m(0.03),
            downstream_throat_radius: m(0.025),
            convergence_angle: deg(30.0),
            divergence_angle: deg(15.0),
        }
    }
}

impl ContourSpec {
    pub fn validate(&self) -> EngineResult<()> {
        positive(self.chamber_fillet_radius.value, "chamber fillet radius")?;
        positive(self.upstream_throat_radius.value, "upstream throat radius")?;
        positive(
            self.downstream_throat_radius.value,
            "downstream throat radius",
        )?;
        for (what, angle) in [
            ("convergence angle", self.convergence_angle.value),
            ("divergence angle", self.divergence_angle.value),
        ] {
            ensure_open_interval(angle, 0.0, FRAC_PI_2, what)
                .map_err(|_| EngineError::InvalidInput { what, value: angle })?;
        }
        Ok(())
    }
}

/// Point on the wall, metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContourPoint {
    #[serde(rename = "x_m")]
    pub x: f64,
    #[serde(rename = "y_m")]
    pub y: f64,
}

impl ContourPoint {
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Wall piece between two consecutive control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContourSegment {
    Line {
        start: ContourPoint,
        end: ContourPoint,
    },
    /// Circular arc; `upper` selects the branch above the centre.
    Arc {
        center: ContourPoint,
        radius: f64,
        upper: bool,
        start: ContourPoint,
        end: ContourPoint,
    },
}

impl ContourSegment {
    pub fn start(&self) -> ContourPoint {
        match *self {
            Self::Line { start, .. } | Self::Arc { start, .. } => start,
        }
    }

    pub fn end(&self) -> ContourPoint {
        match *self {
            Self::Line { end, .. } | Self::Arc { end, .. } => end,
        }
    }

    /// Wall radius at axial position `x`.
    pub fn radius_at(&self, x: f64) -> f64 {
        match *self {
            Self::Line { start, end } => {
                if end.x == start.x {
                    return start.y;
                }
                start.y + (end.y - start.y) / (end.x - start.x) * (x - start.x)
            }
            Self::Arc {
                center,
                radius,
                upper,
                ..
            } => {
                // Rounding at the arc ends can push the argument slightly negative
                let half_chord = (radius * radius - (x - center.x).powi(2)).max(0.0).sqrt();
                if upper {
                    center.y + half_chord
                } else {
                    center.y - half_chord
                }
            }
        }
    }
}

/// Control points and segments of one nozzle.
#[derive(Debug, Clone, PartialEq)]
pub struct NozzleContour {
    pub control_points: [ContourPoint; 7],
    pub segments: [ContourSegment; 6],
}

impl NozzleContour {
    /// Build the contour for a chamber of the given length (injector face to throat) and radii.
    pub fn new(
        chamber_length: f64,
        chamber_radius: f64,
        throat_radius: f64,
        exit_radius: f64,
        spec: &ContourSpec,
    ) -> EngineResult<Self> {
        spec.validate()?;
        positive(chamber_length, "chamber length")?;
        positive(throat_radius, "throat radius")?;
        positive(chamber_radius, "chamber radius")?;
        positive(exit_radius, "exit radius")?;

        let r1 = spec.chamber_fillet_radius.value;
        let r2 = spec.upstream_throat_radius.value;
        let r3 = spec.downstream_throat_radius.value;
        let conv = spec.convergence_angle.value;
        let div = spec.divergence_angle.value;

        let throat = ContourPoint::new(0.0, throat_radius);
        let conv_end = ContourPoint::new(-r2 * conv.sin(), throat_radius + r2 * (1.0 - conv.cos()));
        let fillet_end_y = chamber_radius - r1 * (1.0 - conv.cos());
        if fillet_end_y <= conv_end.y {
            return Err(EngineError::InvalidGeometry {
                what: format!(
                    "chamber radius {chamber_radius} m too small for throat radius \
                     {throat_radius} m and the fillet arcs"
                ),
            });
        }
        let fillet_end = ContourPoint::new(
            conv_end.x - (fillet_end_y - conv_end.y) / conv.tan(),
            fillet_end_y,
        );
        let fillet_start = ContourPoint::new(fillet_end.x - r1 * conv.sin(), chamber_radius);
        let injector = ContourPoint::new(-chamber_length, chamber_radius);
        if injector.x > fillet_start.x {
            return Err(EngineError::InvalidGeometry {
                what: format!(
                    "chamber length {chamber_length} m cannot hold the {:.6} m convergent section",
                    -fillet_start.x
                ),
            });
        }

        let arc_end = ContourPoint::new(r3 * div.sin(), throat_radius + r3 * (1.0 - div.cos()));
        if exit_radius <= arc_end.y {
            return Err(EngineError::InvalidGeometry {
                what: format!(
                    "exit radius {exit_radius} m does not clear the throat arc end at {:.6} m",
                    arc_end.y
                ),
            });
        }
        let exit = ContourPoint::new(
            arc_end.x + (exit_radius - arc_end.y) / div.tan(),
            exit_radius,
        );

        let segments = [
            ContourSegment::Line {
                start: injector,
                end: fillet_start,
            },
            ContourSegment::Arc {
                center: ContourPoint::new(fillet_start.x, chamber_radius - r1),
                radius: r1,
                upper: true,
                start: fillet_start,
                end: fillet_end,
            },
            ContourSegment::Line {
                start: fillet_end,
                end: conv_end,
            },
            ContourSegment::Arc {
                center: ContourPoint::new(0.0, throat_radius + r2),
                radius: r2,
                upper: false,
                start: conv_end,
                end: throat,
            },
            ContourSegment::Arc {
                center: ContourPoint::new(0.0, throat_radius + r3),
                radius: r3,
                upper: false,
                start: throat,
                end: arc_end,
            },
            ContourSegment::Line {
                start: arc_end,
                end: exit,
            },
        ];

        debug!(
            injector_x = injector.x,
            exit_x = exit.x,
            "nozzle contour control points built"
        );

        Ok(Self {
            control_points: [
                injector,
                fillet_start,
                fillet_end,
                conv_end,
                throat,
                arc_end,
                exit,
            ],
            segments,
        })
    }

    pub fn from_performance(perf: &EnginePerformance, spec: &ContourSpec) -> EngineResult<Self> {
        Self::new(
            perf.chamber_length.value,
            perf.chamber_radius(),
            perf.throat_radius(),
            perf.exit_radius(),
            spec,
        )
    }

    /// Overall length, injector face to exit.
    pub fn length(&self) -> f64 {
        self.control_points[6].x - self.control_points[0].x
    }

    /// Sample the wall with axial spacing no larger than `step`.
    ///
    /// Control points are always included; shared segment ends appear once.
    pub fn sample(&self, step: Length) -> EngineResult<Vec<ContourPoint>> {
        let step = positive(step.value, "contour step")?;
        let estimate = self.length() / step + self.segments.len() as f64;
        if estimate > MAX_CONTOUR_SAMPLES as f64 {
            return Err(EngineError::InvalidInput {
                what: "contour step",
                value: step,
            });
        }

        let mut points = vec![self.control_points[0]];
        for segment in &self.segments {
            let (x0, x1) = (segment.start().x, segment.end().x);
            if x1 <= x0 {
                continue;
            }
            let intervals = (((x1 - x0) / step).ceil() as usize).max(1);
            for i in 1..intervals {
                let x = x0 + (x1 - x0) * i as f64 / intervals as f64;
                points.push(ContourPoint::new(x, segment.radius_at(x)));
            }
            points.push(segment.end());
        }
        Ok(points)
    }
}

/// Write sampled points as `x_m,y_m` CSV.
pub fn write_contour_csv<W: Write>(points: &[ContourPoint], writer: W) -> EngineResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let io_error = |e: &dyn std::fmt::Display| EngineError::Io {
        path: "contour output".to_string(),
        message: e.to_string(),
    };
    for p in points {
        wtr.serialize(p).map_err(|e| io_error(&e))?;
    }
    wtr.flush().map_err(|e| io_error(&e))
}

pub fn write_contour_csv_path(points: &[ContourPoint], path: &Path) -> EngineResult<()> {
    let file = std::fs::File::create(path).map_err(|e| EngineError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    write_contour_csv(points, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Chamber and throat of the CH4/LOX fixture engine
    const LC: f64 = 0.179_650_470_5;
    const RC: f64 = 0.04;
    const RT: f64 = 0.016_954_077_76;
    const RE: f64 = 0.033_908_155_53;

    fn contour() -> NozzleContour {
        NozzleContour::new(LC, RC, RT, RE, &ContourSpec::default()).unwrap()
    }

    #[test]
    fn control_points_follow_the_wall_construction() {
        let c = contour();
        let [inj, b, cpt, d, t, n, e] = c.control_points;
        let conv = 30f64.to_radians();
        let div = 15f64.to_radians();

        assert_eq!(inj, ContourPoint::new(-LC, RC));
        assert_eq!(b.y, RC);
        assert_eq!(t, ContourPoint::new(0.0, RT));
        assert!((d.y - RT - 0.03 * (1.0 - conv.cos())).abs() < 1e-15);
        assert!((RC - cpt.y - 0.05 * (1.0 - conv.cos())).abs() < 1e-15);
        // convergent line runs at the convergence angle
        assert!(((cpt.y - d.y) / (d.x - cpt.x) - conv.tan()).abs() < 1e-12);
        assert!((n.x - 0.025 * div.sin()).abs() < 1e-15);
        assert!(((e.y - n.y) / (e.x - n.x) - div.tan()).abs() < 1e-12);
        assert_eq!(e.y, RE);
    }

    #[test]
    fn segments_meet_at_control_points() {
        let c = contour();
        for (i, seg) in c.segments.iter().enumerate() {
            let start = c.control_points[i];
            let end = c.control_points[i + 1];
            assert!((seg.radius_at(start.x) - start.y).abs() < 1e-12, "segment {i} start");
            assert!((seg.radius_at(end.x) - end.y).abs() < 1e-12, "segment {i} end");
        }
    }

    #[test]
    fn sampled_wall_is_continuous_and_narrowest_at_throat() {
        let step = 1e-4;
        let points = contour().sample(m(step)).unwrap();
        assert_eq!(points.first().map(|p| p.x), Some(-LC));
        assert_eq!(points.last().map(|p| p.y), Some(RE));
        for w in points.windows(2) {
            assert!(w[1].x > w[0].x);
            assert!(w[1].x - w[0].x <= step * (1.0 + 1e-9));
            assert!((w[1].y - w[0].y).abs() <= step);
        }
        let narrowest = points.iter().min_by(|a, b| a.y.total_cmp(&b.y)).unwrap();
        assert_eq!(*narrowest, ContourPoint::new(0.0, RT));
    }

    #[test]
    fn short_chamber_is_invalid_geometry() {
        let err = NozzleContour::new(0.03, RC, RT, RE, &ContourSpec::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry { .. }));
    }

    #[test]
    fn chamber_narrower_than_fillets_is_invalid_geometry() {
        let err = NozzleContour::new(LC, 0.02, RT, RE, &ContourSpec::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry { .. }));
    }

    #[test]
    fn exit_inside_throat_arc_is_invalid_geometry() {
        let err = NozzleContour::new(LC, RC, RT, RT, &ContourSpec::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry { .. }));
    }

    #[test]
    fn absurd_step_is_rejected() {
        assert!(contour().sample(m(1e-12)).is_err());
        assert!(contour().sample(m(0.0)).is_err());
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let points = contour().sample(m(0.01)).unwrap();
        let mut buf = Vec::new();
        write_contour_csv(&points, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x_m,y_m"));
        assert_eq!(lines.count(), points.len());
    }
}
