#[derive(Debug, Default)]
struct CliArgs {
    page: Option<String>,
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    keepsake::app::run_with_startup(keepsake::app::AppStartupOptions {
        initial_page: args.page,
        mute: args.mute,
    })
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--page" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--page requires a value");
                };
                // Non-numeric or out-of-range values are ignored downstream.
                out.page = Some(value.clone());
            }
            "--mute" => out.mute = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("Keepsake");
    println!("  --page N   Open on page N (1-5)");
    println!("  --mute     Skip audio output, keep the visual preview");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_value_is_carried_through_verbatim() {
        let args = parse_args(vec![String::from("--page"), String::from("3")]).expect("args");
        assert_eq!(args.page.as_deref(), Some("3"));

        let args = parse_args(vec![String::from("--page"), String::from("9")]).expect("args");
        assert_eq!(args.page.as_deref(), Some("9"), "range handling is downstream");
    }

    #[test]
    fn missing_page_value_is_rejected() {
        assert!(parse_args(vec![String::from("--page")]).is_err());
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(parse_args(vec![String::from("--loud")]).is_err());
    }
}
