use std::f32::consts::PI;
use std::fmt;

/// Spans this close to a full turn are drawn as two half arcs.
const FULL_TURN_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc {
        radius: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    },
    Close,
}

/// A path as typed commands; `Display` yields SVG path data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    pub fn move_to(&mut self, (x, y): (f32, f32)) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    pub fn line_to(&mut self, (x, y): (f32, f32)) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    pub fn arc_to(&mut self, radius: f32, large_arc: bool, sweep: bool, (x, y): (f32, f32)) {
        self.commands.push(PathCommand::Arc {
            radius,
            large_arc,
            sweep,
            x,
            y,
        });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn arcs(&self) -> impl Iterator<Item = &PathCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, PathCommand::Arc { .. }))
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, cmd) in self.commands.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match *cmd {
                PathCommand::MoveTo(x, y) => write!(f, "M {x:.2} {y:.2}")?,
                PathCommand::LineTo(x, y) => write!(f, "L {x:.2} {y:.2}")?,
                PathCommand::Arc {
                    radius,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => write!(
                    f,
                    "A {radius:.2} {radius:.2} 0 {} {} {x:.2} {y:.2}",
                    u8::from(large_arc),
                    u8::from(sweep)
                )?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Polar frame around the chart center. Angle 0 points right; angles grow
/// clockwise on screen because SVG's y axis points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub cx: f32,
    pub cy: f32,
}

impl Polar {
    pub fn new(cx: f32, cy: f32) -> Self {
        Self { cx, cy }
    }

    pub fn centered(size: f32) -> Self {
        Self::new(size / 2.0, size / 2.0)
    }

    pub fn to_cartesian(&self, radius: f32, angle: f32) -> (f32, f32) {
        (
            self.cx + radius * angle.cos(),
            self.cy + radius * angle.sin(),
        )
    }

    /// Closed annular wedge: inner-start, outer-start, outer arc, inner-end,
    /// inner arc back. Callers skip bands with `outer <= inner`.
    pub fn annular_sector_path(
        &self,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
    ) -> PathData {
        let mut path = PathData::default();
        let span = end_angle - start_angle;
        if span >= 2.0 * PI - FULL_TURN_EPSILON {
            let mid = start_angle + span / 2.0;
            path.move_to(self.to_cartesian(inner_radius, start_angle));
            path.line_to(self.to_cartesian(outer_radius, start_angle));
            path.arc_to(outer_radius, false, true, self.to_cartesian(outer_radius, mid));
            path.arc_to(outer_radius, false, true, self.to_cartesian(outer_radius, end_angle));
            path.line_to(self.to_cartesian(inner_radius, end_angle));
            path.arc_to(inner_radius, false, false, self.to_cartesian(inner_radius, mid));
            path.arc_to(inner_radius, false, false, self.to_cartesian(inner_radius, start_angle));
            path.close();
            return path;
        }

        let large_arc = large_arc_flag(start_angle, end_angle);
        path.move_to(self.to_cartesian(inner_radius, start_angle));
        path.line_to(self.to_cartesian(outer_radius, start_angle));
        path.arc_to(outer_radius, large_arc, true, self.to_cartesian(outer_radius, end_angle));
        path.line_to(self.to_cartesian(inner_radius, end_angle));
        path.arc_to(inner_radius, large_arc, false, self.to_cartesian(inner_radius, start_angle));
        path.close();
        path
    }

    /// Open arc at `radius` from `from` to `to`, used as a text guide.
    pub fn guide_arc(&self, radius: f32, from: f32, to: f32, sweep: bool) -> PathData {
        let mut path = PathData::default();
        path.move_to(self.to_cartesian(radius, from));
        path.arc_to(
            radius,
            (to - from).abs() > PI,
            sweep,
            self.to_cartesian(radius, to),
        );
        path
    }
}

pub fn large_arc_flag(start_angle: f32, end_angle: f32) -> bool {
    end_angle - start_angle > PI
}
