use std::{
    fmt::Display,
    io::{self},
    path::PathBuf,
    process::exit,
};

use clap::Parser;

use weekly_wallet::{Credentials, Username};

/// A utility for creating a user or changing an existing user's password.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the credentials file and per-user records.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// The name the user will log in with.
    #[arg(long)]
    username: String,
}

fn main() {
    let args = Args::parse();

    let username = match Username::new(&args.username) {
        Ok(username) => username,
        Err(error) => {
            print_error(error);
            exit(1);
        }
    };

    let credentials_path = args.data_dir.join("users.json");
    let mut credentials = match Credentials::load(&credentials_path) {
        Ok(credentials) => credentials,
        Err(error) => {
            print_error(error);
            exit(1);
        }
    };

    println!("Setting password for {username}");

    let password = match get_new_password() {
        Some(password) => password,
        None => return,
    };

    if let Err(error) = credentials.set_password(username, &password) {
        print_error(error);
        exit(1);
    }

    if let Err(error) = std::fs::create_dir_all(&args.data_dir) {
        print_error(format!(
            "Could not create {}: {error}",
            args.data_dir.display()
        ));
        exit(1);
    }

    if let Err(error) = credentials.save(&credentials_path) {
        print_error(error);
        exit(1);
    }

    println!("Saved credentials to {}", credentials_path.display());
}

fn get_new_password() -> Option<String> {
    loop {
        println!();

        let first_password = match rpassword::prompt_password("Enter a new password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password.is_empty() {
            print_error("Password must not be empty, try again.");
            continue;
        }

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Some(first_password);
    }
}

fn print_error(error: impl Display) {
    eprintln!("Error: {error}");
}
