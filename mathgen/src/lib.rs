//! The mathgen app. For an overview of the generator's design, see
//! [libmathgen's documentation](libmathgen).

#![deny(missing_docs)]

use libmathgen::{AnswerFormat, GeneratorOptions, ProblemGenerator};

/// Options to run mathgen with.
pub struct Opts {
    /// Path to the template program, or `-` to read it from stdin.
    pub template: String,
    /// Name identifying the template in diagnostics.
    pub name: String,
    /// Base seed driving every random draw.
    pub seed: u64,
    /// Number of problems to generate.
    pub count: usize,
    /// Declared answer format; `auto` infers one per answer.
    pub format: String,
    /// Units display option, passed through to generated problems.
    pub units: Option<String>,
    /// When true, generated problems are marked right-to-left.
    pub rtl: bool,
}

/// Parses [Opts](self::Opts) from the command line.
pub fn get_opts() -> Opts {
    let is_u64 = |s: String| {
        s.parse::<u64>()
            .map(|_| ())
            .map_err(|err| err.to_string())
    };
    let matches = clap::App::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            clap::Arg::with_name("template")
                .help("Template program file, or - to read from stdin")
                .required(true),
        )
        .arg(
            clap::Arg::with_name("name")
                .long("--name")
                .help("Template name used in diagnostics")
                .takes_value(true)
                .default_value("template"),
        )
        .arg(
            clap::Arg::with_name("seed")
                .short("-s")
                .long("--seed")
                .help("Base seed; the same seed reproduces the same problems")
                .takes_value(true)
                .default_value("0")
                .validator(is_u64),
        )
        .arg(
            clap::Arg::with_name("count")
                .short("-n")
                .long("--count")
                .help("Number of problems to generate")
                .takes_value(true)
                .default_value("1")
                .validator(is_u64),
        )
        .arg(
            clap::Arg::with_name("format")
                .long("--format")
                .help("Declared answer format")
                .takes_value(true)
                .default_value("auto")
                .possible_values(&["auto", "number", "decimal", "money", "fraction", "mixed"]),
        )
        .arg(
            clap::Arg::with_name("units")
                .long("--units")
                .help("Units display option passed through to generated problems")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("rtl")
                .long("--rtl")
                .help("Mark generated problems right-to-left"),
        )
        .get_matches();

    Opts {
        template: matches.value_of("template").unwrap().into(),
        name: matches.value_of("name").unwrap().into(),
        seed: matches.value_of("seed").unwrap().parse().unwrap(),
        count: matches.value_of("count").unwrap().parse().unwrap(),
        format: matches.value_of("format").unwrap().into(),
        units: matches.value_of("units").map(str::to_owned),
        rtl: matches.is_present("rtl"),
    }
}

/// Output of a mathgen execution.
#[derive(Default)]
pub struct MathgenResult {
    /// Exit code.
    pub code: i32,
    /// Emit for stdout.
    pub stdout: String,
    /// Emit for stderr.
    pub stderr: String,
}

impl MathgenResult {
    fn ok(stdout: String) -> Self {
        Self {
            code: 0,
            stdout,
            stderr: String::new(),
        }
    }

    fn failed(stderr: String) -> Self {
        Self {
            code: 1,
            stdout: String::new(),
            stderr,
        }
    }
}

/// Runs mathgen end-to-end over a template program's source text.
pub fn run_mathgen(opts: &Opts, source: &str) -> MathgenResult {
    let format = match opts.format.parse::<AnswerFormat>() {
        Ok(format) => format,
        Err(..) => {
            return MathgenResult::failed(format!(
                r#""{}" is not an answer format"#,
                opts.format
            ))
        }
    };

    let generator = match ProblemGenerator::new(
        opts.name.clone(),
        source,
        GeneratorOptions {
            seed: opts.seed,
            format,
            units: opts.units.clone(),
            rtl: opts.rtl,
        },
    ) {
        Ok(generator) => generator,
        Err(err) => return MathgenResult::failed(err.to_string()),
    };

    let problems = if opts.count == 1 {
        generator.generate().map(|problem| vec![problem])
    } else {
        generator.generate_multiple(opts.count)
    };
    match problems {
        Ok(problems) => {
            let mut stdout = String::new();
            for problem in problems {
                stdout.push_str(&format!("Q: {}\nA: {}\n", problem.question, problem.answer));
            }
            MathgenResult::ok(stdout)
        }
        Err(err) => MathgenResult::failed(err.to_string()),
    }
}
