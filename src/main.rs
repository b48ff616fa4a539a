// SPDX: CC0-1.0

use anyhow::Context;
use chrono::{DateTime, Local};
use core::num::NonZeroU16;
#[cfg(not(debug_assertions))]
use std::process::Stdio;
use std::{
    fs::OpenOptions,
    io::{self, stdout, BufWriter, Write},
    process::{self, Child, ExitCode, ExitStatus},
};
use tangent_envelope::{
    envelope::EnvelopeErr,
    gnuplot::{self, OutputPaths, Params, Scene},
    shell::{self, Command, Finite},
    SampleGrid, Window,
};

fn output_filename(now: DateTime<Local>, ext: &str) -> String {
    format!(
        "{}_output-{}.{}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S"),
        ext
    )
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct State {
    scene: Scene,
    params: Params,
    win: Window,
    grid: SampleGrid,
    gnuplot: Option<Child>,
}

fn try_main() -> anyhow::Result<()> {
    let scene = Scene::Animated;
    let mut state = State {
        scene,
        params: Params::for_scene(scene),
        win: Window::default(),
        grid: scene.default_grid(),
        gnuplot: None,
    };

    let mut stdout = BufWriter::new(stdout());
    loop {
        writeln!(stdout, "scene = {} ({})", state.scene, state.scene.help())?;

        let mut try_cmd = shell::input(&mut stdout, "> ")?;
        try_cmd.make_ascii_lowercase();
        writeln!(stdout)?;

        if let Ok(cmd) = try_cmd.parse::<Command>() {
            match cmd {
                Command::Help => {
                    for c in Command::exhaustive() {
                        writeln!(stdout, "{name}: {help}", name = c.name(), help = c.help())?;
                    }
                }

                Command::Quit => break,

                Command::SetScene => set_scene(&mut stdout, &mut state)?,

                Command::SetParams => set_params(&mut stdout, &mut state)?,

                Command::SetWin => set_win(&mut stdout, &mut state)?,

                Command::Draw => draw(&mut stdout, &mut state)?,

                Command::PrintFrames => match state.params.envelope() {
                    Ok(envelope) => shell::dump_frames(
                        &mut stdout,
                        &envelope,
                        &state.grid,
                        format_args!("frames"),
                    )?,
                    Err(err) => envelope_error(&mut stdout, &err)?,
                },
            }
        } else if !try_cmd.is_empty() {
            if let Some(similar) = Command::most_similar(&try_cmd) {
                writeln!(
                    stdout,
                    r#"Unknown command, did you mean "{}"? try "help" for help"#,
                    similar.name()
                )?;
            } else {
                writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
            }
        }

        writeln!(stdout)?;
    }

    stop_gnuplot(state.gnuplot.take()).context("failed to stop gnuplot child")?;
    stdout.flush()?;
    Ok(())
}

fn set_scene<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    for scene in Scene::exhaustive() {
        writeln!(out, "{name}: {help}", name = scene.name(), help = scene.help())?;
    }
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;

    let mut reply = shell::input(&mut out, format_args!("?scene (is {}) = ", state.scene))?;
    reply.make_ascii_lowercase();
    match shell::parse_reply::<_, Scene>(&mut out, &reply, true)? {
        Ok(Some(new)) if new != state.scene => {
            state.scene = new;
            state.params = Params::for_scene(new);
            state.grid = new.default_grid();
            writeln!(out, "note: params and sample grid reset to the defaults of {new}")?;
        }
        Ok(_) | Err(_) => {}
    }
    Ok(())
}

fn set_params<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "params = {:#}", state.params)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;

    // validate into a copy so a bad reply leaves every value as it was
    let mut params = state.params.clone();
    for (name, dst) in [
        ("a", &mut params.a),
        ("b", &mut params.b),
        ("slope min", &mut params.slopes.start),
        ("slope max", &mut params.slopes.end),
    ] {
        match shell::read_fromstr::<_, Finite>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(Finite(new))) => *dst = new,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    writeln!(out, "note: tangent count must be a positive integer")?;
    match shell::read_fromstr::<_, usize>(
        &mut out,
        format_args!("?tangent count (is {cur}) = ", cur = params.count),
        true,
    )? {
        Ok(Some(0)) => {
            envelope_error(&mut out, &EnvelopeErr::InvalidCount { count: 0 })?;
            return Ok(());
        }
        Ok(Some(new)) => params.count = new,
        Ok(None) => {}
        Err(_) => return Ok(()),
    }

    match shell::read_fromstr::<_, u32>(
        &mut out,
        format_args!("?frame interval in ms (is {cur}) = ", cur = params.interval_ms),
        true,
    )? {
        Ok(Some(new)) => params.interval_ms = new,
        Ok(None) => {}
        Err(_) => return Ok(()),
    }

    if params.a == 0.0 {
        writeln!(
            out,
            "note: with a = 0 the parabola is the x axis and has no tangents to draw"
        )?;
    }
    state.params = params;
    Ok(())
}

fn set_win<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "win = {:#}", state.win)?;
    writeln!(out, "grid = {:#}", state.grid)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;

    // like params, nothing changes unless every reply is valid
    let mut win = state.win.clone();
    let mut domain = state.grid.domain().clone();
    for (name, dst) in [
        ("x min", &mut win.x.start),
        ("x max", &mut win.x.end),
        ("y min", &mut win.y.start),
        ("y max", &mut win.y.end),
        ("tick", &mut win.tick),
        ("sample x min", &mut domain.start),
        ("sample x max", &mut domain.end),
    ] {
        match shell::read_fromstr::<_, Finite>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(Finite(new))) => *dst = new,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    writeln!(out, "note: samples must be a nonzero integer")?;
    let mut samples = state.grid.samples();
    match shell::read_fromstr::<_, NonZeroU16>(
        &mut out,
        format_args!("?samples (is {samples}) = "),
        true,
    )? {
        Ok(Some(new)) => samples = new,
        Ok(None) => {}
        Err(_) => return Ok(()),
    }

    state.win = win;
    state.grid = SampleGrid::new(domain, samples);
    Ok(())
}

fn envelope_error<W: Write>(mut out: W, err: &EnvelopeErr) -> anyhow::Result<()> {
    writeln!(out, "envelope error: {err}")?;
    match err {
        EnvelopeErr::InvalidCount { .. } => {
            writeln!(out, r#"note: use "params" to set the tangent count"#)?;
        }
        EnvelopeErr::DivisionByZero { .. } => {
            writeln!(out, r#"note: use "params" to set a nonzero coefficient a"#)?;
        }
    }
    Ok(())
}

/// Kills and reaps `child`. Returns `None` if there was no child.
fn stop_gnuplot(child: Option<Child>) -> io::Result<Option<ExitStatus>> {
    let Some(mut child) = child else {
        return Ok(None);
    };
    // nothing to kill if the user already closed the window
    if child.try_wait()?.is_none() {
        child.kill()?;
    }
    child.wait().map(Some)
}

fn draw<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    // rejected before any file is created or the current plot is closed
    if let Err(err) = state.params.validate(state.scene) {
        envelope_error(&mut out, &err)?;
        return Ok(());
    }
    if state.scene == Scene::Parabola && state.params.parabola().is_degenerate() {
        writeln!(out, "note: with a = 0 the parabola degenerates into the x axis")?;
    }

    // the old window would otherwise keep replaying the previous drawing
    stop_gnuplot(state.gnuplot.take()).context("failed to stop previous gnuplot child")?;

    let now = Local::now();
    let data_path = output_filename(now, "data");
    let gnuplot_path = output_filename(now, "gnuplot");
    let svg_path = output_filename(now, "svg");
    let mut data = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&data_path)
            .context("failed to open output data file")?,
    );
    let mut script = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&gnuplot_path)
            .context("failed to open output gnuplot file")?,
    );

    let tangents = match gnuplot::write_data(&mut data, state.scene, &state.params, &state.grid)
        .context("failed to write to output data file")?
    {
        Ok(tangents) => tangents,
        Err(err) => {
            envelope_error(&mut out, &err)?;
            return Ok(());
        }
    };
    data.flush()?;
    data.get_mut().sync_data()?;
    drop(data);
    writeln!(out, "evaluation ok")?;
    if tangents > 0 {
        writeln!(out, "{tangents} tangents written to {data_path}")?;
    }

    gnuplot::write_script(
        &mut script,
        state.scene,
        &state.params,
        &state.win,
        OutputPaths {
            data: &data_path,
            svg: &svg_path,
        },
    )
    .context("failed to write to output gnuplot file")?;
    script.flush()?;
    script.get_mut().sync_data()?;
    drop(script);

    // spawn gnuplot and provide the path to the file
    let mut cmd = process::Command::new("gnuplot");
    cmd.arg("--persist").arg(&gnuplot_path);
    #[cfg(not(debug_assertions))]
    {
        cmd.stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null());
    }
    let child = cmd
        .spawn()
        .context("failed to spawn gnuplot (is it installed and in ${PATH}?)")?;

    state.gnuplot = Some(child);
    Ok(())
}
