use mathgen::{get_opts, run_mathgen, MathgenResult};
use std::io::{Read, Write};
use termcolor::{BufferedStandardStream, Color, ColorChoice, ColorSpec, WriteColor};

fn main_impl() -> Result<(), Box<dyn std::error::Error>> {
    let opts = get_opts();

    let source = if opts.template == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        source
    } else {
        std::fs::read_to_string(&opts.template)?
    };

    let MathgenResult {
        code,
        stdout,
        stderr,
    } = run_mathgen(&opts, &source);

    let mut ch_stdout = BufferedStandardStream::stdout(ColorChoice::Auto);
    let mut ch_stderr = BufferedStandardStream::stderr(ColorChoice::Auto);
    let use_color = atty::is(atty::Stream::Stderr) && ch_stderr.supports_color();

    if !stderr.is_empty() {
        if use_color {
            ch_stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        }
        write!(&mut ch_stderr, "error: ")?;
        if use_color {
            ch_stderr.reset()?;
        }
        writeln!(&mut ch_stderr, "{}", stderr)?;
        ch_stderr.flush()?;
    }
    if !stdout.is_empty() {
        write!(&mut ch_stdout, "{}", stdout)?;
        ch_stdout.flush()?;
    }

    std::process::exit(code)
}

fn main() {
    let out = std::panic::catch_unwind(main_impl);

    match out {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
        Err(..) => {
            eprint!("\nnote: you found an internal mathgen error (IME)!\n");
            eprint!("\nnote: we would appreciate a bug report with the template that caused it\n");
            std::process::exit(2);
        }
    }
}
