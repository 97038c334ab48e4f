use crate::event::Response;
use crate::ui::{record_table, theme, Fields, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::PLANE, text.style(theme().banner.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().saved.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().failure.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().notice.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().lifecycle.clone()),
        label.style(theme().label.clone()),
        value
    );
}

/// Print one engine response: records as tables, failures to stderr.
pub fn response(response: &Response) {
    match response {
        Response::ContinentSearchResult { continent } | Response::ContinentLoaded { continent } => {
            println!("{}", record_table(continent));
        }
        Response::CountrySearchResult { country } | Response::CountryLoaded { country } => {
            println!("{}", record_table(country));
        }
        Response::RegionSearchResult { region } | Response::RegionLoaded { region } => {
            println!("{}", record_table(region));
        }
        Response::ContinentSaved { continent } => saved("continent", continent),
        Response::CountrySaved { country } => saved("country", country),
        Response::RegionSaved { region } => saved("region", region),
        Response::DatabaseOpened { path } => info("Opened", &path.display().to_string()),
        Response::DatabaseClosed => info("Closed", "database"),
        Response::EndApplication => {}
        Response::DatabaseOpenFailed { message }
        | Response::ContinentLoadFailed { message }
        | Response::SaveContinentFailed { message }
        | Response::CountryLoadFailed { message }
        | Response::SaveCountryFailed { message }
        | Response::RegionLoadFailed { message }
        | Response::SaveRegionFailed { message }
        | Response::Error { message } => error(message),
    }
}

fn saved(kind: &str, record: &impl Fields) {
    success(&format!("Saved {}", kind));
    println!("{}", record_table(record));
}
