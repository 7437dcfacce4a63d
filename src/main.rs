// SPDX-License-Identifier: MPL-2.0
use proctor_lens::app::{self, Flags};

const HELP: &str = "\
proctor_lens

USAGE:
  proctor_lens [OPTIONS]

OPTIONS:
  --lang <LOCALE>        Interface language (e.g. en-US, fr)
  --candidate <JSON>     Candidate record to place in the session cache
  --api-url <URL>        Service base URL
  --device <DEVICE>      Camera device
  --config-dir <PATH>    Directory holding settings.toml
  --data-dir <PATH>      Directory for diagnostics exports
  -h, --help             Print this help
";

fn parse_flags(mut args: pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        candidate: args.opt_value_from_str("--candidate")?,
        api_url: args.opt_value_from_str("--api-url")?,
        device: args.opt_value_from_str("--device")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        eprintln!("Ignoring unexpected arguments: {remaining:?}");
    }
    Ok(flags)
}

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let flags = match parse_flags(args) {
        Ok(flags) => flags,
        Err(error) => {
            eprintln!("Error: {error}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    app::run(flags)
}
