use std::path;
use std::str::FromStr;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::Arg;
use clap::Command;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::app::App;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Theme;

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_projects() -> Command {
    return Command::new("projects")
        .about("Manage your game projects.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List all your projects, newest first."))
        .subcommand(
            Command::new("create").about("Create a new Roblox game project.").arg(
                Arg::new("name")
                    .help("Project name")
                    .required(true)
                    .num_args(1),
            ),
        )
        .subcommand(
            Command::new("delete").about("Delete a project by id.").arg(
                Arg::new("project-id")
                    .help("Project ID")
                    .required(true)
                    .num_args(1),
            ),
        );
}

fn subcommand_payment() -> Command {
    return Command::new("payment")
        .about("Payment helpers.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("confirm")
                .about("Confirm a checkout by polling its payment status.")
                .arg(
                    Arg::new("session-id")
                        .short('i')
                        .long("session-id")
                        .help("Checkout session id")
                        .num_args(1),
                )
                .arg(
                    Arg::new("url")
                        .short('u')
                        .long("url")
                        .help("Checkout redirect URL containing a session_id query parameter")
                        .num_args(1),
                ),
        );
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("notfox")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Sign in to NotFox.")
                .arg(Arg::new("email").long("email").num_args(1).help("Account email")),
        )
        .subcommand(
            Command::new("register")
                .about("Create a NotFox account.")
                .arg(Arg::new("email").long("email").num_args(1).help("Account email"))
                .arg(Arg::new("username").long("username").num_args(1).help("Display name")),
        )
        .subcommand(Command::new("logout").about("Sign out and clear the stored session."))
        .subcommand(Command::new("whoami").about("Show the signed-in account."))
        .subcommand(
            Command::new("theme")
                .about("Set your theme preference.")
                .arg(
                    Arg::new("theme")
                        .help("Theme name")
                        .required(true)
                        .num_args(1)
                        .value_parser(PossibleValuesParser::new(Theme::VARIANTS)),
                ),
        )
        .subcommand(subcommand_projects())
        .subcommand(
            Command::new("chat")
                .about("Chat with the NotFox assistant inside a project.")
                .arg(
                    Arg::new("project")
                        .short('p')
                        .long("project")
                        .help("Project id or name. Prompts when omitted.")
                        .num_args(1),
                ),
        )
        .subcommand(Command::new("plans").about("List subscription plans."))
        .subcommand(
            Command::new("subscribe")
                .about("Start a premium checkout and wait for confirmation.")
                .arg(
                    Arg::new("plan")
                        .help("Plan id (weekly, monthly, yearly)")
                        .required(true)
                        .num_args(1),
                ),
        )
        .subcommand(subcommand_payment())
        .subcommand(Command::new("plugin").about("Show Roblox Studio plugin status."))
        .subcommand(subcommand_config())
        .arg(
            Arg::new(ConfigKey::BaseUrl.to_string())
                .long(ConfigKey::BaseUrl.to_string())
                .env("NOTFOX_BASE_URL")
                .num_args(1)
                .help(format!(
                    "NotFox backend base URL. [default: {}]",
                    Config::default(ConfigKey::BaseUrl)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("NOTFOX_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StateDir.to_string())
                .long(ConfigKey::StateDir.to_string())
                .env("NOTFOX_STATE_DIR")
                .num_args(1)
                .help(format!(
                    "Directory holding client state such as the persisted session. [default: {}]",
                    Config::default(ConfigKey::StateDir)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::PaymentPollAttempts.to_string())
                .long(ConfigKey::PaymentPollAttempts.to_string())
                .env("NOTFOX_PAYMENT_POLL_ATTEMPTS")
                .num_args(1)
                .help(format!(
                    "Number of payment status polls before giving up. [default: {}]",
                    Config::default(ConfigKey::PaymentPollAttempts)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::PaymentPollInterval.to_string())
                .long(ConfigKey::PaymentPollInterval.to_string())
                .env("NOTFOX_PAYMENT_POLL_INTERVAL")
                .num_args(1)
                .help(format!(
                    "Delay in milliseconds between payment status polls. [default: {}]",
                    Config::default(ConfigKey::PaymentPollInterval)
                ))
                .global(true),
        );
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    if let Some(("config", subcmd_matches)) = matches.subcommand() {
        match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
            }
            _ => {
                subcommand_config().print_long_help()?;
            }
        }
        return Ok(());
    }

    let subcmd_matches = matches
        .subcommand()
        .map(|(_, subcmd_matches)| return subcmd_matches);
    let mut config_matches = vec![&matches];
    if let Some(subcmd_matches) = subcmd_matches {
        config_matches.push(subcmd_matches);
    }
    Config::load(build(), config_matches).await?;

    let mut app = App::from_config();

    match matches.subcommand() {
        Some(("login", sub)) => {
            app.login_command(sub.get_one::<String>("email").map(String::as_str))
                .await?;
        }
        Some(("register", sub)) => {
            app.register_command(
                sub.get_one::<String>("email").map(String::as_str),
                sub.get_one::<String>("username").map(String::as_str),
            )
            .await?;
        }
        Some(("logout", _)) => {
            app.sign_out();
            println!("Signed out.");
        }
        Some(("whoami", _)) => {
            app.whoami_command().await?;
        }
        Some(("theme", sub)) => {
            let theme_str = sub.get_one::<String>("theme").unwrap();
            let theme = Theme::from_str(theme_str)?;
            app.theme_command(theme).await?;
        }
        Some(("projects", sub)) => match sub.subcommand() {
            Some(("list", _)) => {
                app.list_projects_command().await?;
            }
            Some(("create", create_matches)) => {
                let name = create_matches.get_one::<String>("name").unwrap();
                app.create_project_command(name).await?;
            }
            Some(("delete", delete_matches)) => {
                let project_id = delete_matches.get_one::<String>("project-id").unwrap();
                app.delete_project_command(project_id).await?;
            }
            _ => {
                subcommand_projects().print_long_help()?;
            }
        },
        Some(("chat", sub)) => {
            app.chat_command(sub.get_one::<String>("project").map(String::as_str))
                .await?;
        }
        Some(("plans", _)) => {
            app.plans_command().await?;
        }
        Some(("subscribe", sub)) => {
            let plan = sub.get_one::<String>("plan").unwrap();
            app.subscribe_command(plan).await?;
        }
        Some(("payment", sub)) => match sub.subcommand() {
            Some(("confirm", confirm_matches)) => {
                app.confirm_payment_command(
                    confirm_matches.get_one::<String>("session-id").map(String::as_str),
                    confirm_matches.get_one::<String>("url").map(String::as_str),
                )
                .await?;
            }
            _ => {
                subcommand_payment().print_long_help()?;
            }
        },
        Some(("plugin", _)) => {
            app.plugin_command().await?;
        }
        _ => {}
    }

    return Ok(());
}
