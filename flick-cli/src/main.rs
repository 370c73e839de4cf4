use std::{env, io, io::BufRead, process, sync::Arc, thread};

use crossbeam_channel::{unbounded, Sender};
use env_logger::{Builder, Env};
use flick_core::{
    error::Error,
    movie::{Movie, MovieId},
    webapi::WebApi,
};
use flick_view::{
    cmd::ViewEvent,
    controller::{DetailController, DetailView},
    data::{Config, Nav, NavStack, Store},
    delegate::Delegate,
};

const ENV_LOG: &str = "FLICK_LOG";
const ENV_LOG_STYLE: &str = "FLICK_LOG_STYLE";

fn main() {
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let Some(movie_id) = env::args().nth(1).and_then(|arg| arg.parse().ok()) else {
        eprintln!("usage: flick <movie_id>");
        process::exit(2);
    };

    if let Err(err) = start(MovieId(movie_id)) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn start(movie_id: MovieId) -> Result<(), Error> {
    let config = Config::load().unwrap_or_default();
    let webapi = Arc::new(WebApi::new(
        &config.api_url,
        Config::proxy().as_deref(),
        config.response_cache_dir(),
    )?);
    let movie = Arc::new(webapi.get_movie(movie_id)?);

    let store = Store::new();
    let controller =
        DetailController::with_store(&config, &store, NavStack::new(Nav::MovieDetail(movie.clone())));
    let (sender, receiver) = unbounded();
    let mut delegate = Delegate::new(controller, webapi, sender.clone());
    delegate.handle(ViewEvent::Enter(movie));
    render(&delegate.view());

    let _input_thread = thread::spawn(move || read_commands(sender));

    delegate.process(receiver, render);

    Ok(())
}

fn read_commands(sender: Sender<ViewEvent>) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let event = match parse_command(line.trim()) {
            Some(event) => event,
            None => {
                log::warn!("unknown command: {:?}", line);
                continue;
            }
        };
        if sender.send(event).is_err() {
            break;
        }
    }
    let _ = sender.send(ViewEvent::Shutdown);
}

fn parse_command(line: &str) -> Option<ViewEvent> {
    let (command, arg) = line
        .split_once(' ')
        .map_or((line, ""), |(command, arg)| (command, arg.trim()));
    match command {
        "g" if !arg.is_empty() => Some(ViewEvent::ToggleGenre(arg.into())),
        "c" => Some(ViewEvent::ClearGenres),
        "<" => Some(ViewEvent::NavigateBack),
        ">" => Some(ViewEvent::NavigateForward),
        "o" => arg.parse().ok().map(ViewEvent::OpenRecommendation),
        "r" => Some(ViewEvent::Refetch),
        "n" => arg.parse().ok().map(ViewEvent::SetRecommendationCount),
        "q" => Some(ViewEvent::Shutdown),
        _ => None,
    }
}

fn render(view: &DetailView) {
    let Some(movie) = &view.subject else {
        println!("(no movie)");
        return;
    };
    print_header(movie);

    if !view.selection.is_empty() {
        let selection: Vec<&str> = view.selection.iter().map(AsRef::as_ref).collect();
        println!("Filter: {}", selection.join(" + "));
    }
    if let Some(err) = &view.load_error {
        println!("Could not load recommendations: {}", err);
    }
    if view.loading {
        println!("Loading recommendations...");
    } else if view.filtered.is_empty() {
        println!("No recommendations.");
    }
    for (index, similar) in view.filtered.iter().enumerate() {
        let genres: Vec<&str> = similar.genre_names().collect();
        println!(
            "  [{}] {} ({}) {}",
            index,
            similar.title,
            similar.release_year(),
            genres.join(", ")
        );
    }

    let mut controls = vec!["g <genre>", "c", "o <n>", "r", "n <count>", "q"];
    if view.can_go_back {
        controls.push("<");
    }
    if view.can_go_forward {
        controls.push(">");
    }
    println!("{}", controls.join("  "));
}

fn print_header(movie: &Movie) {
    println!();
    println!("{} ({})", movie.title, movie.release_year());
    if !movie.tagline.is_empty() {
        println!("{}", movie.tagline);
    }
    println!("Released {}, rated {:.1}", movie.release(), movie.vote_average);
    if !movie.credits.director.is_empty() {
        println!("Directed by {}", movie.credits.director);
    }
    if !movie.credits.actors.is_empty() {
        println!("Starring {}", movie.credits.actors_display());
    }
    if !movie.overview.is_empty() {
        println!("{}", movie.overview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert!(matches!(parse_command("g Action"), Some(ViewEvent::ToggleGenre(g)) if &*g == "Action"));
        assert!(matches!(
            parse_command("g Science Fiction"),
            Some(ViewEvent::ToggleGenre(g)) if &*g == "Science Fiction"
        ));
        assert!(matches!(parse_command("o 3"), Some(ViewEvent::OpenRecommendation(3))));
        assert!(matches!(parse_command("n 12"), Some(ViewEvent::SetRecommendationCount(12))));
        assert!(matches!(parse_command("<"), Some(ViewEvent::NavigateBack)));
        assert!(parse_command("g").is_none());
        assert!(parse_command("o x").is_none());
        assert!(parse_command("play").is_none());
    }
}
