extern crate aaline;
extern crate clap;

mod commands;
mod fuzzing;
mod stroke;

use aaline::tessellation::{Color, LineJoin, Smoothing, StrokeOptions};
use clap::*;
use commands::*;

use std::fs::File;
use std::io::{self, stdout, Read};
use std::process;

fn main() {
    env_logger::init();

    let matches = App::new("aaline command-line interface")
        .version("0.1")
        .author("The aaline developers")
        .about("Tessellates thick anti-aliased polylines")
        .arg(Arg::with_name("PATH")
            .value_name("PATH")
            .help("A polyline in the SVG path syntax (M, L, H, V and Z commands)")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .short("i")
            .long("input")
            .value_name("FILE")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("OUTPUT")
            .help("Sets the output file to use")
            .value_name("FILE")
            .short("o")
            .long("output")
            .takes_value(true)
            .required(false)
        )
        .args(&stroke_args())
        .arg(Arg::with_name("COLOR")
            .long("color")
            .help("Color of the geometry as #rrggbb or #rrggbbaa (white by default)")
            .value_name("COLOR")
            .takes_value(true)
        )
        .arg(Arg::with_name("COUNT")
            .short("c")
            .long("count")
            .help("Prints the number of triangles and vertices")
        )
        .arg(Arg::with_name("SVG")
            .long("svg")
            .help("Prints the triangles as an SVG document")
        )
        .arg(Arg::with_name("WIREFRAME")
            .long("wireframe")
            .help("Outlines the triangles of the SVG document")
            .requires("SVG")
        )
        .subcommand(SubCommand::with_name("fuzz")
            .about("Tessellates random polylines in a loop")
            .args(&stroke_args())
            .arg(Arg::with_name("MAX_POINTS")
                .long("max-points")
                .help("Sets the maximum number of points per path (5000 by default)")
                .value_name("MAX_POINTS")
                .takes_value(true)
            )
            .arg(Arg::with_name("MIN_POINTS")
                .long("min-points")
                .help("Sets the minimum number of points per path (5 by default)")
                .value_name("MIN_POINTS")
                .takes_value(true)
            )
            .arg(Arg::with_name("ITERATIONS")
                .long("iterations")
                .help("Stops after this many paths (runs forever by default)")
                .value_name("ITERATIONS")
                .takes_value(true)
            )
        )
        .get_matches();

    if let Some(fuzz_matches) = matches.subcommand_matches("fuzz") {
        let cmd = FuzzCmd {
            options: get_stroke_options(fuzz_matches),
            min_points: get_number(fuzz_matches, "MIN_POINTS"),
            max_points: get_number(fuzz_matches, "MAX_POINTS"),
            iterations: get_number(fuzz_matches, "ITERATIONS"),
        };

        if !fuzzing::run(cmd) {
            process::exit(1);
        }

        return;
    }

    let mut input_buffer = matches.value_of("PATH").unwrap_or("").to_string();

    if let Some(input_file) = matches.value_of("INPUT") {
        let read = File::open(input_file)
            .and_then(|mut file| file.read_to_string(&mut input_buffer));
        if let Err(e) = read {
            fail(&format!("Cannot read file {input_file}: {e}"));
        }
    }

    let output: Box<dyn io::Write> = match matches.value_of("OUTPUT") {
        Some(output_file) => match File::create(output_file) {
            Ok(file) => Box::new(file),
            Err(e) => fail(&format!("Cannot create file {output_file}: {e}")),
        },
        None => Box::new(stdout()),
    };

    let color = match matches.value_of("COLOR") {
        Some(src) => parse_color(src).unwrap_or_else(|| fail(&format!("Invalid color {src:?}"))),
        None => Color::WHITE,
    };

    let output_format = if matches.is_present("COUNT") {
        OutputFormat::Count
    } else if matches.is_present("SVG") {
        OutputFormat::Svg {
            wireframe: matches.is_present("WIREFRAME"),
        }
    } else {
        OutputFormat::Buffers
    };

    let cmd = StrokeCmd {
        input: input_buffer,
        output,
        options: get_stroke_options(&matches),
        color,
        output_format,
    };

    if let Err(e) = stroke::stroke(cmd) {
        fail(&e.to_string());
    }
}

fn stroke_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("LINE_WIDTH")
            .short("w")
            .long("line-width")
            .help("The line width (1.0 by default)")
            .value_name("LINE_WIDTH")
            .takes_value(true),
        Arg::with_name("LINE_JOIN")
            .long("join")
            .help("The line join: none, miter, bevel or round (miter by default)")
            .value_name("LINE_JOIN")
            .takes_value(true),
        Arg::with_name("MITER_LIMIT")
            .long("miter-limit")
            .help("Miter joins turning more than this (a cosine in (0, 1]) become bevel joins (0.9 by default)")
            .value_name("MITER_LIMIT")
            .takes_value(true),
        Arg::with_name("LENGTH_SMOOTHING")
            .long("length-smoothing")
            .help("Anti-aliasing factor along the segments (1.0 by default)")
            .value_name("LENGTH_SMOOTHING")
            .takes_value(true),
        Arg::with_name("THICKNESS_SMOOTHING")
            .long("thickness-smoothing")
            .help("Anti-aliasing factor across the segments (0.9 by default)")
            .value_name("THICKNESS_SMOOTHING")
            .takes_value(true),
        Arg::with_name("NO_AXIS_SNAP")
            .long("no-axis-snap")
            .help("Anti-aliases horizontal, vertical and thin lines too"),
        Arg::with_name("PIXEL_SNAP")
            .long("pixel-snap")
            .help("Snaps the points of the path to the pixel grid"),
        Arg::with_name("ROUND_STEP")
            .long("round-step")
            .help("Angle in degrees covered by each triangle of round joins (10 by default)")
            .value_name("ROUND_STEP")
            .takes_value(true),
    ]
}

fn get_stroke_options(matches: &ArgMatches) -> StrokeOptions {
    let mut options = StrokeOptions::default();

    if let Some(width) = get_number(matches, "LINE_WIDTH") {
        options.line_width = width;
    }
    if let Some(src) = matches.value_of("LINE_JOIN") {
        options.line_join = parse_line_join(src)
            .unwrap_or_else(|| fail(&format!("Invalid line join {src:?}")));
    }
    if let Some(limit) = get_number(matches, "MITER_LIMIT") {
        options.miter_limit = limit;
    }

    let mut smoothing = Smoothing::DEFAULT;
    if let Some(length) = get_number(matches, "LENGTH_SMOOTHING") {
        smoothing.length = length;
    }
    if let Some(thickness) = get_number(matches, "THICKNESS_SMOOTHING") {
        smoothing.thickness = thickness;
    }
    options.smoothing = smoothing;

    options.axis_snap = !matches.is_present("NO_AXIS_SNAP");
    options.pixel_snap = matches.is_present("PIXEL_SNAP");

    if let Some(degrees) = get_number::<f32>(matches, "ROUND_STEP") {
        options.round_join_step = degrees.to_radians();
    }

    if let Err(e) = options.validate() {
        fail(&format!("Invalid stroke options: {e}"));
    }

    log::info!("stroke options: {:?}", options);
    if options.line_join == LineJoin::Round {
        log::info!("round join step: {} radians", options.round_join_step);
    }

    options
}

fn get_number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    let src = matches.value_of(name)?;
    match src.parse() {
        Ok(value) => Some(value),
        Err(_) => fail(&format!("Invalid value {src:?} for {name}")),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("ERROR: {message}");
    process::exit(1);
}
