// SPDX: CC0-1.0

//! Text output for gnuplot: a data file with one block per curve and a script
//! that lays out the plane and plots (or animates) those blocks.

use crate::{
    curve::{Line, Parabola},
    envelope::{Envelope, EnvelopeErr},
    Number, SampleGrid, Window,
};
use core::{fmt, ops::Range};
use std::io::{self, Write};

pub const OUTPUT_RES: [u32; 2] = [1920, 1080];

const CURVE_COLOR: &str = "#008000";
// gnuplot alpha is inverted: 0xb3 leaves the tangents 30% opaque
const TANGENT_COLOR: &str = "#b3ff0000";
const TANGENT_WIDTH: Number = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Plane,
    Line,
    Parabola,
    Envelope,
    Animated,
}

impl Scene {
    pub const fn exhaustive() -> &'static [Scene] {
        &[
            Self::Plane,
            Self::Line,
            Self::Parabola,
            Self::Envelope,
            Self::Animated,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plane => "plane",
            Self::Line => "line",
            Self::Parabola => "parabola",
            Self::Envelope => "envelope",
            Self::Animated => "animated",
        }
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Plane => "empty cartesian plane",
            Self::Line => "the line y = ax + b",
            Self::Parabola => "the parabola y = ax^2",
            Self::Envelope => "the parabola and all of its tangents at once",
            Self::Animated => "tangents drawn one per frame, tracing the envelope",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Plane => "Cartesian plane",
            Self::Line => "Line",
            Self::Parabola => "Parabola",
            Self::Envelope | Self::Animated => "Envelope of parabola tangent lines",
        }
    }

    pub const fn has_tangents(&self) -> bool {
        matches!(self, Self::Envelope | Self::Animated)
    }

    /// Sample grid the scene is first drawn on.
    pub fn default_grid(&self) -> SampleGrid {
        let samples = SampleGrid::default().samples();
        match self {
            Self::Animated => SampleGrid::default(),
            Self::Plane | Self::Line | Self::Parabola | Self::Envelope => {
                SampleGrid::new(-10.0..10.0, samples)
            }
        }
    }
}

impl core::str::FromStr for Scene {
    type Err = UnknownScene;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for scene in Self::exhaustive() {
            if s == scene.name() {
                return Ok(*scene);
            }
        }
        Err(UnknownScene)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownScene;

impl fmt::Display for UnknownScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scene")
    }
}

/// Everything the user can tweak about the curves of one drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    /// `a` in both `y = ax + b` and `y = ax^2`
    pub a: Number,
    pub b: Number,
    pub count: usize,
    pub slopes: Range<Number>,
    /// pause between animation frames
    pub interval_ms: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            count: 50,
            slopes: -1.0..1.0,
            interval_ms: 1,
        }
    }
}

impl Params {
    /// Coefficients the scene is first drawn with. The animated scene uses
    /// [`Params::default`].
    pub fn for_scene(scene: Scene) -> Self {
        match scene {
            Scene::Plane | Scene::Line | Scene::Animated => Self::default(),
            Scene::Parabola => Self {
                a: 0.3,
                ..Self::default()
            },
            Scene::Envelope => Self {
                a: 0.2,
                slopes: -10.0..10.0,
                ..Self::default()
            },
        }
    }

    /// Checks that `scene` can be drawn with these params without writing
    /// anything.
    pub fn validate(&self, scene: Scene) -> Result<(), EnvelopeErr> {
        if scene.has_tangents() {
            self.envelope()?;
        }
        Ok(())
    }

    pub fn line(&self) -> Line {
        Line::new(self.a, self.b)
    }

    pub fn parabola(&self) -> Parabola {
        Parabola::new(self.a)
    }

    pub fn envelope(&self) -> Result<Envelope, EnvelopeErr> {
        Envelope::new(self.a, self.slopes.clone(), self.count)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("a", &self.a)
            .field("b", &self.b)
            .field("tangent count", &self.count)
            .field("slope range", &self.slopes)
            .field("frame interval (ms)", &self.interval_ms)
            .finish()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPaths<'a> {
    pub data: &'a str,
    pub svg: &'a str,
}

fn write_block<W: Write>(mut out: W, xs: &[Number], ys: &[Number]) -> io::Result<()> {
    for (x, y) in xs.iter().zip(ys) {
        writeln!(out, "{x} {y}")?;
    }
    // two blank lines end a gnuplot data block
    writeln!(out)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the curves of `scene`: first the line or parabola, then one block
/// per tangent in slope order. The parabola block is written for the animated
/// scene too, so tangent `i` is always at `index i`, even though that scene
/// never plots the parabola itself. Returns how many tangent blocks were written.
pub fn write_data<W: Write>(
    mut out: W,
    scene: Scene,
    params: &Params,
    grid: &SampleGrid,
) -> io::Result<Result<usize, EnvelopeErr>> {
    let xs = grid.xs();
    match scene {
        Scene::Plane => {}
        Scene::Line => write_block(&mut out, xs, &params.line().sample(xs))?,
        Scene::Parabola => write_block(&mut out, xs, &params.parabola().sample(xs))?,
        Scene::Envelope | Scene::Animated => {
            // validate before touching the output so a failure writes nothing
            let envelope = match params.envelope() {
                Ok(envelope) => envelope,
                Err(err) => return Ok(Err(err)),
            };
            write_block(&mut out, xs, &envelope.parabola().sample(xs))?;
            for frame in envelope.frames(grid) {
                write_block(&mut out, xs, &frame.curve)?;
            }
            return Ok(Ok(envelope.len()));
        }
    }
    Ok(Ok(0))
}

fn write_axes<W: Write>(mut out: W, scene: Scene, win: &Window) -> io::Result<()> {
    writeln!(out, r#"set title "{}""#, scene.title())?;
    writeln!(
        out,
        "set xrange[{min}:{max}]",
        min = win.x.start,
        max = win.x.end
    )?;
    writeln!(
        out,
        "set yrange[{min}:{max}]",
        min = win.y.start,
        max = win.y.end
    )?;

    // axes through the origin, no frame, no grid
    writeln!(out, "unset grid")?;
    writeln!(out, "set border 0")?;
    writeln!(out, "set xzeroaxis linetype -1")?;
    writeln!(out, "set yzeroaxis linetype -1")?;
    writeln!(out, "set xtics axis {tick} nomirror", tick = win.tick)?;
    writeln!(out, "set ytics axis {tick} nomirror", tick = win.tick)?;
    writeln!(out, "set size ratio -1")?;
    Ok(())
}

fn write_label<W: Write>(mut out: W, params: &Params) -> io::Result<()> {
    writeln!(out, "set style textbox opaque noborder")?;
    writeln!(
        out,
        r#"set label 1 "{eq}" at graph 0.7,0.9 center front boxed font ",14""#,
        eq = params.parabola()
    )
}

fn plot_command(scene: Scene, params: &Params, data: &str, last: &str) -> String {
    match scene {
        // nothing to draw, but gnuplot needs a plot to show the axes
        Scene::Plane => String::from("plot 1/0 notitle"),
        Scene::Line => format!(
            r#"plot '{data}' index 0 with lines linestyle 1 title "{line}""#,
            line = params.line()
        ),
        Scene::Parabola => format!("plot '{data}' index 0 with lines linestyle 1 notitle"),
        Scene::Envelope => format!(
            "plot '{data}' index 0 with lines linestyle 1 notitle, \\\n  \
             for [j=1:{last}] '{data}' index j with lines linestyle 2 notitle"
        ),
        // the parabola only shows up as the envelope of its tangents
        Scene::Animated => {
            format!("plot for [j=1:{last}] '{data}' index j with lines linestyle 2 notitle")
        }
    }
}

/// Writes a script that saves an svg of the finished drawing and then shows
/// it in gnuplot's interactive terminal. An animated scene replays the
/// tangents there one per frame and adds the equation of the parabola on the
/// last one.
pub fn write_script<W: Write>(
    mut out: W,
    scene: Scene,
    params: &Params,
    win: &Window,
    paths: OutputPaths<'_>,
) -> io::Result<()> {
    let OutputPaths { data, svg } = paths;
    let count = params.count;

    writeln!(out, "reset")?;
    writeln!(out, "set term push")?;
    let [width, height] = OUTPUT_RES;
    writeln!(out, "set terminal svg size {width},{height} enhanced")?;
    writeln!(out, "set output '{svg}'")?;

    write_axes(&mut out, scene, win)?;

    writeln!(
        out,
        "set style line 1 linecolor rgb '{CURVE_COLOR}' linewidth 1.5"
    )?;
    writeln!(
        out,
        "set style line 2 linecolor rgb '{TANGENT_COLOR}' linewidth {TANGENT_WIDTH}"
    )?;
    if scene == Scene::Line {
        writeln!(out, "set key top left")?;
    } else {
        writeln!(out, "unset key")?;
    }
    if scene == Scene::Animated {
        write_label(&mut out, params)?;
    }

    // finished drawing to svg
    writeln!(out, "{}", plot_command(scene, params, data, &count.to_string()))?;
    writeln!(out, "set output")?;
    writeln!(out, "set term pop")?;

    if scene == Scene::Animated {
        let pause = Number::from(params.interval_ms) / 1000.0;
        writeln!(out, "unset label 1")?;
        writeln!(out, "do for [i=1:{count}] {{")?;
        writeln!(out, "  if (i == {count}) {{")?;
        write_label(&mut out, params)?;
        writeln!(out, "  }}")?;
        writeln!(out, "  {}", plot_command(scene, params, data, "i"))?;
        writeln!(out, "  pause {pause}")?;
        writeln!(out, "}}")?;
    } else {
        writeln!(out, "replot")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroU16;

    const PATHS: OutputPaths<'static> = OutputPaths {
        data: "out.data",
        svg: "out.svg",
    };

    fn small_grid() -> SampleGrid {
        SampleGrid::new(-1.0..1.0, NonZeroU16::new(3).unwrap())
    }

    fn data(scene: Scene, params: &Params) -> (String, Result<usize, EnvelopeErr>) {
        let mut buf = Vec::new();
        let res = write_data(&mut buf, scene, params, &small_grid()).unwrap();
        (String::from_utf8(buf).unwrap(), res)
    }

    fn script(scene: Scene, params: &Params) -> String {
        let mut buf = Vec::new();
        write_script(&mut buf, scene, params, &Window::default(), PATHS).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn scene_names_round_trip() {
        for scene in Scene::exhaustive() {
            assert_eq!(scene.name().parse::<Scene>(), Ok(*scene));
        }
        assert_eq!("circle".parse::<Scene>(), Err(UnknownScene));
    }

    #[test]
    fn plane_has_no_data() {
        let (text, res) = data(Scene::Plane, &Params::default());
        assert!(text.is_empty());
        assert_eq!(res, Ok(0));
    }

    #[test]
    fn parabola_block() {
        let params = Params {
            a: 2.0,
            ..Params::default()
        };
        let (text, res) = data(Scene::Parabola, &params);
        assert_eq!(text, "-1 2\n0 0\n1 2\n\n\n");
        assert_eq!(res, Ok(0));
    }

    #[test]
    fn line_block() {
        let params = Params {
            a: 1.0,
            b: 3.0,
            ..Params::default()
        };
        let (text, _) = data(Scene::Line, &params);
        assert_eq!(text, "-1 2\n0 3\n1 4\n\n\n");
    }

    #[test]
    fn envelope_blocks() {
        let params = Params {
            count: 3,
            ..Params::default()
        };
        let (text, res) = data(Scene::Envelope, &params);
        assert_eq!(res, Ok(3));
        let blocks: Vec<&str> = text.trim_end().split("\n\n\n").collect();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], "-1 1\n0 0\n1 1");
        // slope -1: y = -x - 1/4
        assert_eq!(blocks[1], "-1 0.75\n0 -0.25\n1 -1.25");
        assert_eq!(blocks[3], "-1 -1.25\n0 -0.25\n1 0.75");
    }

    #[test]
    fn envelope_errors_write_nothing() {
        let params = Params {
            a: 0.0,
            ..Params::default()
        };
        let (text, res) = data(Scene::Animated, &params);
        assert!(text.is_empty());
        assert!(matches!(res, Err(EnvelopeErr::DivisionByZero { .. })));

        let params = Params {
            count: 0,
            ..Params::default()
        };
        let (text, res) = data(Scene::Envelope, &params);
        assert!(text.is_empty());
        assert_eq!(res, Err(EnvelopeErr::InvalidCount { count: 0 }));
    }

    #[test]
    fn script_lays_out_textbook_axes() {
        let text = script(Scene::Plane, &Params::default());
        assert!(text.contains(r#"set title "Cartesian plane""#));
        assert!(text.contains("set xrange[-20:20]"));
        assert!(text.contains("set yrange[-5:10]"));
        assert!(text.contains("set border 0"));
        assert!(text.contains("set xtics axis 5 nomirror"));
        assert!(text.contains("set size ratio -1"));
        assert!(text.contains("set output 'out.svg'"));
        assert!(text.contains("plot 1/0 notitle"));
        assert!(text.trim_end().ends_with("replot"));
    }

    #[test]
    fn static_envelope_plots_every_tangent() {
        let text = script(Scene::Envelope, &Params::default());
        assert!(text.contains("for [j=1:50] 'out.data' index j"));
        assert!(!text.contains("do for"));
        assert!(!text.contains("set label"));
    }

    #[test]
    fn animation_adds_one_tangent_per_frame() {
        let params = Params {
            a: 0.5,
            count: 20,
            interval_ms: 40,
            ..Params::default()
        };
        let text = script(Scene::Animated, &params);
        assert!(text.contains("do for [i=1:20] {"));
        assert!(text.contains("for [j=1:i] 'out.data' index j"));
        assert!(text.contains("pause 0.04"));
        assert!(text.contains(r#"set label 1 "y = 0.5x^2" at graph 0.7,0.9"#));
        assert!(text.contains("if (i == 20) {"));
        assert!(!text.contains("replot"));
    }

    #[test]
    fn line_is_titled_with_its_equation() {
        let params = Params {
            a: 2.0,
            b: -1.0,
            ..Params::default()
        };
        let text = script(Scene::Line, &params);
        assert!(text.contains(r#"title "y = 2x - 1""#));
        assert!(text.contains("set key top left"));
    }

    #[test]
    fn animation_only_plots_tangents() {
        let text = script(Scene::Animated, &Params::default());
        assert!(!text.contains("index 0"));
        assert!(text.contains("plot for [j=1:50] 'out.data' index j"));
        assert!(text.contains("plot for [j=1:i] 'out.data' index j"));

        // the still drawing keeps its parabola
        let text = script(Scene::Envelope, &Params::default());
        assert!(text.contains("'out.data' index 0 with lines linestyle 1"));
    }

    #[test]
    fn animated_data_keeps_tangent_indices() {
        let params = Params {
            count: 2,
            ..Params::default()
        };
        let (text, res) = data(Scene::Animated, &params);
        assert_eq!(res, Ok(2));
        // parabola block first, so tangent j is still at index j
        assert_eq!(text.trim_end().split("\n\n\n").count(), 3);
    }

    #[test]
    fn scene_defaults() {
        let envelope = Params::for_scene(Scene::Envelope);
        assert_eq!(envelope.a, 0.2);
        assert_eq!(envelope.slopes, -10.0..10.0);
        assert_eq!(envelope.count, 50);
        assert_eq!(Params::for_scene(Scene::Parabola).a, 0.3);
        assert_eq!(Params::for_scene(Scene::Line).line(), Line::new(1.0, 0.0));
        assert_eq!(Params::for_scene(Scene::Animated), Params::default());

        assert_eq!(Scene::Envelope.default_grid().domain(), &(-10.0..10.0));
        assert_eq!(Scene::Animated.default_grid().domain(), &(-20.0..20.0));
        for scene in Scene::exhaustive() {
            assert_eq!(scene.default_grid().samples().get(), 100);
        }
    }

    #[test]
    fn validation_only_concerns_tangent_scenes() {
        let flat = Params {
            a: 0.0,
            ..Params::default()
        };
        assert_eq!(flat.validate(Scene::Line), Ok(()));
        assert_eq!(flat.validate(Scene::Parabola), Ok(()));
        assert!(matches!(
            flat.validate(Scene::Animated),
            Err(EnvelopeErr::DivisionByZero { .. })
        ));
        assert_eq!(
            Params {
                count: 0,
                ..Params::default()
            }
            .validate(Scene::Envelope),
            Err(EnvelopeErr::InvalidCount { count: 0 })
        );
    }
}
