use anyhow::Result;
use std::path::{Path, PathBuf};

use super::error;
use super::{Cli, Commands};
use crate::browser::{Session, UiSurface, WebDriverSurface};
use crate::download::FileFetcher;
use crate::error::Error;
use crate::settings::{self, Settings, SettingsPatch};

/// Handle the parsed command line and return an exit code
pub async fn handle(cli: Cli) -> i32 {
    let settings_path = match cli.settings {
        Some(path) => path,
        None => match crate::util::paths::default_settings_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Error: {e}");
                return error::ERROR;
            }
        },
    };

    let result = match cli.command {
        Some(Commands::TestLogin) => handle_test_login(&settings_path, &cli.webdriver).await,
        Some(Commands::SetEmail { email }) => handle_set_email(&settings_path, email),
        Some(Commands::SetProjects { projects }) => handle_set_projects(&settings_path, projects),
        Some(Commands::SetSavePath { path }) => handle_set_save_path(&settings_path, path),
        Some(Commands::SetUrl { url }) => handle_set_url(&settings_path, url),
        None => handle_run(&settings_path, &cli.webdriver).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            error::ERROR
        }
    }
}

/// Log in with the stored credentials and report the outcome
async fn handle_test_login(settings_path: &Path, webdriver: &str) -> Result<i32> {
    let settings = load_complete_settings(settings_path)?;

    let surface = WebDriverSurface::launch(webdriver).await?;
    let mut session = Session::new(surface);

    match session.login(&settings).await {
        Ok(()) => {
            println!("Login test: successful");
            session.surface().close().await?;
            Ok(error::SUCCESS)
        }
        Err(Error::LoginRejected) => {
            // The session already closed the browser
            eprintln!("Can't log in. Check username and password.");
            Ok(error::ERROR)
        }
        Err(e) => Err(e.into()),
    }
}

/// Full run: login, then export every configured project
async fn handle_run(settings_path: &Path, webdriver: &str) -> Result<i32> {
    let settings = load_complete_settings(settings_path)?;
    let fetcher = FileFetcher::new();

    let surface = WebDriverSurface::launch(webdriver).await?;
    let mut session = Session::new(surface);

    match session.login(&settings).await {
        Ok(()) => println!("Login successful."),
        Err(Error::LoginRejected) => {
            eprintln!("Can't log in. Check username and password.");
            return Ok(error::ERROR);
        }
        Err(e) => return Err(e.into()),
    }

    for project in &settings.projects {
        session.select_project(project).await?;

        println!("Getting image");
        let image = session.export_as_image(&fetcher, &settings.save_path).await?;
        println!("Saved {}", image.display());

        println!("Getting spreadsheet");
        let spreadsheet = session
            .export_as_spreadsheet(&fetcher, &settings.save_path)
            .await?;
        println!("Saved {}", spreadsheet.display());

        session.surface().close().await?;
    }

    Ok(error::SUCCESS)
}

fn handle_set_email(settings_path: &Path, email: String) -> Result<i32> {
    let password = rpassword::prompt_password("Password: ")?;
    Settings::save(
        settings_path,
        SettingsPatch {
            email: Some(email),
            password: Some(password),
            ..Default::default()
        },
    )?;
    println!("Email and password updated.");
    Ok(error::SUCCESS)
}

fn handle_set_projects(settings_path: &Path, projects: String) -> Result<i32> {
    Settings::save(
        settings_path,
        SettingsPatch {
            projects: Some(settings::parse_project_list(&projects)),
            ..Default::default()
        },
    )?;
    println!("Project list updated.");
    Ok(error::SUCCESS)
}

fn handle_set_save_path(settings_path: &Path, path: PathBuf) -> Result<i32> {
    if !path.is_dir() {
        return Err(Error::InvalidSavePath(path).into());
    }
    Settings::save(
        settings_path,
        SettingsPatch {
            save_path: Some(path),
            ..Default::default()
        },
    )?;
    println!("Save path updated.");
    Ok(error::SUCCESS)
}

fn handle_set_url(settings_path: &Path, url: String) -> Result<i32> {
    Settings::save(
        settings_path,
        SettingsPatch {
            url: Some(url),
            ..Default::default()
        },
    )?;
    println!("Url updated.");
    Ok(error::SUCCESS)
}

/// Load settings and fail before any browser work if a field is empty
fn load_complete_settings(settings_path: &Path) -> Result<Settings> {
    let settings = Settings::load(settings_path);
    settings.require_complete()?;
    Ok(settings)
}
