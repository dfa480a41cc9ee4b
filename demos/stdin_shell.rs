use std::fmt::Write as _;
use std::io::{stdin, stdout, Read, Stdin, Stdout, Write};

use vtline::{parse_args, Config, Flow, Session, Terminal};

/// Stands in for a serial port. Run it with the terminal in raw mode
/// (`stty raw -echo`) to get the full editing keys; in cooked mode each
/// newline is treated as Enter.
struct Console {
    input: Stdin,
    output: Stdout,
}

impl Terminal for Console {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let len = self.input.read(buf)?;
        for b in &mut buf[..len] {
            if *b == b'\n' {
                *b = b'\r';
            }
        }
        Ok(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.output.write_all(data)?;
        self.output.flush()?;
        Ok(data.len())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let console = Console {
        input: stdin(),
        output: stdout(),
    };
    let mut session = Session::with_config(console, Config::with_prompt("> "));
    let result = session.run(|session, line| {
        parse_args(line, |argc, argv| match argv.first().copied() {
            Some("exit") => Flow::Exit,
            Some("prompt") if argc > 1 => {
                session.set_prompt(argv[1]);
                Flow::Continue
            }
            Some(_) => {
                let _ = write!(session, "argc={argc} argv={argv:?}\r\n");
                Flow::Continue
            }
            None => Flow::Continue,
        })
    });

    match result {
        Ok(()) | Err(vtline::SessionError::EndOfStream) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
