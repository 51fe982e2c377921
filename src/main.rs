use log::debug;

fn main() {
    env_logger::init();

    let result = ship_tracks::get_arg().and_then(|config| {
        let output = config.output.clone();
        ship_tracks::run(config).map(|_| output)
    });

    // every failure ends the run the same way: one line, normal exit.
    if let Err(e) = &result {
        debug!("{e:?}");
    }
    println!("{}", ship_tracks::outcome_line(&result));
}
