#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("necklace_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use necklace_engine::geom::{
        AngleUnit, Arc3, ArcLengthCurve, Axis, Circle3, CubicBezier3, CurveInput, Line3, Point3,
        Polyline3, Vec3,
    };
    use necklace_engine::necklace::{SamplingConfig, sample};

    const USAGE: &str = r"necklace_cli (necklace-engine)

USAGE:
  necklace_cli list
  necklace_cli run <scenario> [options]

SCENARIOS:
  circle
  line
  zigzag
  arc
  bezier

OPTIONS (run):
  --count <n>        Number of samples (default 8)
  --loop             Wrap lengths past the curve ends
  --spread           Do not anchor the last sample on the curve end
  --shift <len>      Global shift added to every sample
  --twist <deg>      Twist around the tangent, in degrees
  --front <x|y|z>    Axis that follows the tangent (default x)
  --up <x|y|z>       Axis that follows the up vector (default y)
  --radians          Print rotations in radians
  -h, --help         Show this help
";

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                for scenario in Scenario::ALL {
                    println!("{}", scenario.name());
                }
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;
        let scenario = Scenario::from_str(&scenario_name)
            .ok_or_else(|| format!("unknown scenario `{scenario_name}` (try `necklace_cli list`)"))?;

        let mut config = SamplingConfig::default().with_sample_count(8);
        let mut front = Axis::X;
        let mut up = Axis::Y;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--count" => config.sample_count = parse(&args.value("--count")?, "--count")?,
                "--loop" => config.loop_enabled = true,
                "--spread" => config.anchor_end = false,
                "--shift" => config.global_shift = parse(&args.value("--shift")?, "--shift")?,
                "--twist" => {
                    let degrees: f64 = parse(&args.value("--twist")?, "--twist")?;
                    config.twist = degrees.to_radians();
                }
                "--front" => front = args.value("--front")?.parse().map_err(|e| format!("{e}"))?,
                "--up" => up = args.value("--up")?.parse().map_err(|e| format!("{e}"))?,
                "--radians" => config.angle_unit = AngleUnit::Radians,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }
        let config = config.with_axes(front, up);

        let curve = scenario.curve()?;
        let count = usize::try_from(config.sample_count)
            .map_err(|_| format!("--count must not be negative, got {}", config.sample_count))?;
        let shifts = vec![0.0; count];
        let result = sample(&curve, &config, &shifts).map_err(|e| e.to_string())?;

        println!(
            "# {} ({}), length {:.6}, {} samples",
            scenario.name(),
            curve.kind(),
            result.curve_length,
            result.len()
        );
        for s in &result.samples {
            println!(
                "{} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
                s.index,
                s.length,
                s.position.x,
                s.position.y,
                s.position.z,
                s.rotation.x,
                s.rotation.y,
                s.rotation.z
            );
        }

        let diagnostics = result.diagnostics;
        if diagnostics.degenerate_frames() > 0 {
            eprintln!(
                "warning: {} degenerate frames ({} zero tangents, {} parallel up vectors)",
                diagnostics.degenerate_frames(),
                diagnostics.zero_tangents,
                diagnostics.parallel_up_vectors
            );
        }
        Ok(())
    }

    fn parse<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
        value
            .parse()
            .map_err(|_| format!("invalid value `{value}` for {flag}"))
    }

    #[derive(Debug, Clone, Copy)]
    enum Scenario {
        Circle,
        Line,
        Zigzag,
        Arc,
        Bezier,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::Circle,
            Scenario::Line,
            Scenario::Zigzag,
            Scenario::Arc,
            Scenario::Bezier,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::Circle => "circle",
                Scenario::Line => "line",
                Scenario::Zigzag => "zigzag",
                Scenario::Arc => "arc",
                Scenario::Bezier => "bezier",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|s| s.name() == name)
        }

        fn curve(self) -> Result<CurveInput, String> {
            let curve = match self {
                Scenario::Circle => CurveInput::Circle(
                    Circle3::try_new(Point3::ORIGIN, Vec3::new(0.0, 0.0, 1.0), 5.0)
                        .map_err(|e| e.to_string())?,
                ),
                Scenario::Line => CurveInput::Line(Line3::new(
                    Point3::ORIGIN,
                    Point3::new(10.0, 0.0, 0.0),
                )),
                Scenario::Zigzag => CurveInput::Polyline(
                    Polyline3::new(
                        vec![
                            Point3::new(0.0, 0.0, 0.0),
                            Point3::new(2.0, 2.0, 0.0),
                            Point3::new(4.0, 0.0, 0.0),
                            Point3::new(6.0, 2.0, 0.0),
                            Point3::new(8.0, 0.0, 0.0),
                        ],
                        false,
                    )
                    .map_err(|e| e.to_string())?,
                ),
                Scenario::Arc => CurveInput::Arc(Arc3::new(
                    Point3::ORIGIN,
                    Vec3::new(0.0, 0.0, 1.0),
                    4.0,
                    0.0,
                    std::f64::consts::PI,
                )),
                Scenario::Bezier => CurveInput::Bezier(ArcLengthCurve::new(CubicBezier3::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(2.0, 4.0, 0.0),
                    Point3::new(6.0, -4.0, 2.0),
                    Point3::new(8.0, 0.0, 2.0),
                ))),
            };
            Ok(curve)
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
