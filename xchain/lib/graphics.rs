//! Rendering of runs while they are being computed.
//!
//! [`Visual`] wraps a dynamics engine and, once [created][Visual::create],
//! yields a [`Rendered`] engine with the same [`Solve`] contract. Every
//! [`Frame`] reported by the wrapped engine is drawn with [`plotters`]' bitmap
//! backend as soon as it arrives: appended to an animated GIF, written over
//! the still image (which therefore ends up showing the last frame) and,
//! optionally, saved as its own snapshot. A run that fails part way keeps
//! everything drawn up to that point.
//!
//! Plots carry no text; bars are the per-site exciton populations and, when
//! expectation values are plotted, a red marker shows the mean site with a
//! bar of one standard deviation on either side.

use std::path::Path;
use plotters::{ coord::Shift, prelude::* };
use serde::{ Deserialize, Serialize };
use crate::{
    artifacts::RunArtifacts,
    dynamics::{ Dynamics, Frame, Kind, Observer, Solve },
    error::{ RenderError, RunResult },
};

const MARGIN: i32 = 20;

/// What to draw for each frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotType {
    /// Exciton population on each site.
    #[default]
    Populations,
    /// Energy level ladder beside the populations of the current level;
    /// TISE only.
    Levels,
}

impl PlotType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Populations => "populations",
            Self::Levels => "levels",
        }
    }
}

fn def_plot_expect() -> bool { true }

fn def_figure_size() -> (u32, u32) { (1050, 450) }

fn def_frame_rate() -> u32 { 1 }

/// Rendering options.
///
/// Unknown keys (such as a window position) are rejected rather than ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    #[serde(default)]
    pub plot_type: PlotType,
    /// Draw expectation values over the populations.
    #[serde(default = "def_plot_expect")]
    pub plot_expect: bool,
    /// Figure width and height in pixels.
    #[serde(default = "def_figure_size")]
    pub figure_size: (u32, u32),
    /// Write every frame to its own image.
    #[serde(default)]
    pub snapshots: bool,
    /// Frames per second in the animation.
    #[serde(default = "def_frame_rate")]
    pub frame_rate: u32,
    /// Where images and the animation go; nothing is written if `None`.
    #[serde(skip)]
    pub outputs: Option<RunArtifacts>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            plot_type: PlotType::default(),
            plot_expect: def_plot_expect(),
            figure_size: def_figure_size(),
            snapshots: false,
            frame_rate: def_frame_rate(),
            outputs: None,
        }
    }
}

impl PlotConfig {
    /// Write images and the animation to the files of `artifacts`.
    pub fn for_run(mut self, artifacts: &RunArtifacts) -> Self {
        self.outputs = Some(artifacts.clone());
        self
    }

    pub(crate) fn validate(&self, kind: Kind) -> Result<(), RenderError> {
        let (w, h) = self.figure_size;
        if w == 0 || h == 0 {
            return Err(RenderError::FigureSize(w, h));
        }
        if self.frame_rate == 0 {
            return Err(RenderError::FrameRate);
        }
        if self.plot_type == PlotType::Levels && kind != Kind::Tise {
            return Err(RenderError::PlotType(self.plot_type.name(), kind.name()));
        }
        Ok(())
    }
}

/// Visualization adapter for a dynamics engine.
#[derive(Clone, Debug)]
pub struct Visual<D> {
    dynamics: D,
    config: PlotConfig,
}

impl<D> Visual<D>
where D: Dynamics
{
    pub fn new(dynamics: D, config: PlotConfig) -> Self {
        Self { dynamics, config }
    }

    /// Check the rendering options against the wrapped engine.
    pub fn create(self) -> RunResult<Rendered<D>> {
        self.config.validate(D::KIND)?;
        let (w, h) = self.config.figure_size;
        log::info!(
            "{} visualization: {} plot, {}x{} px, {} fps",
            D::KIND.name(), self.config.plot_type.name(), w, h,
            self.config.frame_rate,
        );
        Ok(Rendered { dynamics: self.dynamics, config: self.config })
    }
}

/// Dynamics engine that renders while solving.
#[derive(Clone, Debug)]
pub struct Rendered<D> {
    dynamics: D,
    config: PlotConfig,
}

impl<D> Rendered<D>
where D: Dynamics
{
    pub fn dynamics(&self) -> &D { &self.dynamics }

    pub fn into_dynamics(self) -> D { self.dynamics }
}

impl<D> Solve for Rendered<D>
where D: Dynamics
{
    type Output = D::Output;

    fn solve(&mut self) -> RunResult<D::Output> {
        let mut renderer = Renderer {
            config: &self.config,
            n_site: self.dynamics.n_site(),
            energy_range: self.dynamics.plot_range(),
            labels: Vec::new(),
            movie: None,
        };
        let output = self.dynamics.solve_with(&mut renderer)?;
        renderer.finish();
        Ok(output)
    }
}

// draws each frame as it arrives; the GIF is finalized when this is dropped,
// so a failed solve still leaves the frames drawn so far
struct Renderer<'a> {
    config: &'a PlotConfig,
    n_site: usize,
    energy_range: Option<(f64, f64)>,
    // labels of all frames seen so far, for the level ladder
    labels: Vec<f64>,
    movie: Option<DrawingArea<BitMapBackend<'a>, Shift>>,
}

fn draw_err<E>(err: E) -> RenderError
where E: std::fmt::Display
{
    RenderError::Draw(err.to_string())
}

impl<'a> Renderer<'a> {
    fn energy_range(&self) -> (f64, f64) {
        if let Some(range) = self.energy_range { return range; }
        let (lo, hi)
            = self.labels.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                (lo.min(*e), hi.max(*e))
            });
        if lo < hi {
            let pad = 0.05 * (hi - lo);
            (lo - pad, hi + pad)
        } else if lo.is_finite() {
            (lo - 0.5, lo + 0.5)
        } else {
            (0.0, 1.0)
        }
    }

    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, frame: &Frame)
        -> Result<(), RenderError>
    where DB: DrawingBackend
    {
        area.fill(&WHITE).map_err(draw_err)?;
        match self.config.plot_type {
            PlotType::Populations => {
                draw_populations(area, frame, self.n_site, self.config.plot_expect)?;
            },
            PlotType::Levels => {
                let (w, _) = area.dim_in_pixel();
                let split = (w as f64 * 0.3) as i32;
                let (ladder, pops) = area.split_horizontally(split);
                draw_levels(&ladder, &self.labels, self.energy_range())?;
                draw_populations(&pops, frame, self.n_site, self.config.plot_expect)?;
            },
        }
        area.present().map_err(draw_err)?;
        Ok(())
    }

    fn write_image(&self, path: &Path, frame: &Frame) -> Result<(), RenderError> {
        let area
            = BitMapBackend::new(path, self.config.figure_size)
            .into_drawing_area();
        self.draw(&area, frame)
    }

    fn open_movie(&self, path: &Path)
        -> Result<DrawingArea<BitMapBackend<'a>, Shift>, RenderError>
    {
        let delay = (1000 / self.config.frame_rate).max(1);
        let area
            = BitMapBackend::gif(path, self.config.figure_size, delay)
            .map_err(draw_err)?
            .into_drawing_area();
        log::info!(
            "animating at {} fps to {}", self.config.frame_rate, path.display());
        Ok(area)
    }

    fn finish(self) {
        let Some(outputs) = self.config.outputs.as_ref() else { return; };
        if self.labels.is_empty() {
            log::warn!("no frames were computed; nothing to render");
            return;
        }
        log::info!(
            "wrote {} frames to {}; last frame in {}",
            self.labels.len(),
            outputs.movie_file().display(),
            outputs.image_file().display(),
        );
    }
}

impl<'a> Observer for Renderer<'a> {
    fn observe(&mut self, frame: &Frame) -> RunResult<()> {
        self.labels.push(frame.label);
        let config = self.config;
        let Some(outputs) = config.outputs.as_ref() else { return Ok(()); };
        let movie = match self.movie.take() {
            Some(movie) => movie,
            None => self.open_movie(&outputs.movie_file())?,
        };
        self.draw(&movie, frame)?;
        self.movie = Some(movie);
        self.write_image(&outputs.image_file(), frame)?;
        if config.snapshots {
            let path = outputs.snapshot_file(frame.index);
            self.write_image(&path, frame)?;
            log::debug!("wrote snapshot {}", path.display());
        }
        Ok(())
    }
}

// bars for the populations, which are bounded by 1
fn draw_populations<DB>(
    area: &DrawingArea<DB, Shift>,
    frame: &Frame,
    n_site: usize,
    plot_expect: bool,
) -> Result<(), RenderError>
where DB: DrawingBackend
{
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let width = (w - 2 * MARGIN).max(1) as f64;
    let height = (h - 2 * MARGIN).max(1) as f64;
    let bottom = h - MARGIN;
    let bar = width / n_site.max(1) as f64;
    let site_x = |x: f64| MARGIN + (x * bar) as i32;

    for (j, p) in frame.populations.iter().enumerate() {
        let top = bottom - (p.clamp(0.0, 1.0) * height) as i32;
        let x0 = site_x(j as f64) + 1;
        let x1 = (site_x(j as f64 + 1.0) - 1).max(x0);
        area.draw(&Rectangle::new([(x0, top), (x1, bottom)], BLUE.filled()))
            .map_err(draw_err)?;
    }
    area.draw(&PathElement::new(
        vec![(MARGIN, bottom), (w - MARGIN, bottom)], BLACK.stroke_width(1)))
        .map_err(draw_err)?;

    if plot_expect && frame.expect.norm > 0.0 {
        let center = site_x(frame.expect.position + 0.5);
        let lo = site_x(frame.expect.position + 0.5 - frame.expect.spread);
        let hi = site_x(frame.expect.position + 0.5 + frame.expect.spread);
        let mid = bottom - (0.5 * height) as i32;
        area.draw(&PathElement::new(
            vec![(center, MARGIN), (center, bottom)], RED.stroke_width(2)))
            .map_err(draw_err)?;
        area.draw(&PathElement::new(
            vec![(lo, mid), (hi, mid)], RED.stroke_width(2)))
            .map_err(draw_err)?;
    }
    Ok(())
}

// one horizontal line per level reported so far; the latest one in red
fn draw_levels<DB>(
    area: &DrawingArea<DB, Shift>,
    labels: &[f64],
    (e_min, e_max): (f64, f64),
) -> Result<(), RenderError>
where DB: DrawingBackend
{
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let height = (h - 2 * MARGIN).max(1) as f64;
    let bottom = h - MARGIN;
    let current = labels.len().saturating_sub(1);
    for (k, e) in labels.iter().enumerate() {
        if !(e_min..=e_max).contains(e) { continue; }
        let y = bottom - ((e - e_min) / (e_max - e_min) * height) as i32;
        let style = if k == current { RED.stroke_width(3) } else { BLACK.stroke_width(1) };
        area.draw(&PathElement::new(vec![(MARGIN, y), (w - MARGIN, y)], style))
            .map_err(draw_err)?;
    }
    area.draw(&PathElement::new(
        vec![(MARGIN, MARGIN), (MARGIN, bottom)], BLACK.stroke_width(1)))
        .map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        basis::BasisSpec,
        dynamics::{ Expectations, InitialState, tdse::*, tise::* },
        error::{ RunError, SolverError },
        hamilton::Coupled,
        model::ChainModel,
        store::Persistence,
    };

    fn hamilton(n_site: usize, periodic: bool) -> Coupled {
        let model = ChainModel {
            n_site,
            periodic,
            alpha: 0.1.into(),
            beta: (-0.01).into(),
            nu: 1e-3.into(),
            omg: (1e-3 * 2.0_f64.sqrt()).into(),
            ..ChainModel::default()
        };
        let mut h = Coupled::new(model).unwrap();
        h.get_tt(BasisSpec::new(vec![2, 4], false).unwrap()).unwrap();
        h
    }

    fn tdse(n_site: usize) -> Tdse {
        let spec = TdseSpec {
            num_steps: 3,
            step_size: 20.0,
            sub_steps: 2,
            solver: TdseMethod::Sm,
            normalize: Normalize::Off,
            max_rank: 12,
            repeats: 1,
            threshold: 1e-12,
        };
        let mut tdse
            = Tdse::new(hamilton(n_site, false), spec, Persistence::default())
            .unwrap();
        tdse.set_initial_state(InitialState::Fundamental).unwrap();
        tdse
    }

    fn tise() -> Tise {
        let spec = TiseSpec {
            n_levels: 4,
            solver: TiseMethod::Als,
            eigen: MicroEigen::Eigs,
            ranks: 20,
            repeats: 20,
            conv_eps: 1e-8,
            e_est: 0.07,
            e_min: 0.07,
            e_max: 0.1,
        };
        Tise::new(hamilton(5, true), spec, Persistence::default()).unwrap()
    }

    fn small(outputs: Option<RunArtifacts>) -> PlotConfig {
        PlotConfig {
            figure_size: (160, 90),
            frame_rate: 4,
            outputs,
            ..PlotConfig::default()
        }
    }

    #[test]
    fn invalid_options_are_rejected() {
        let mut config = small(None);
        config.figure_size = (0, 90);
        assert!(matches!(
            Visual::new(tdse(3), config).create(),
            Err(RunError::Render(RenderError::FigureSize(0, 90))),
        ));
        let mut config = small(None);
        config.frame_rate = 0;
        assert!(matches!(
            Visual::new(tdse(3), config).create(),
            Err(RunError::Render(RenderError::FrameRate)),
        ));
        let mut config = small(None);
        config.plot_type = PlotType::Levels;
        assert!(matches!(
            Visual::new(tdse(3), config.clone()).create(),
            Err(RunError::Render(RenderError::PlotType("levels", "TDSE"))),
        ));
        assert!(Visual::new(tise(), config).create().is_ok());
    }

    #[test]
    fn rendering_matches_plain_solve() {
        let mut plain = tdse(7);
        let expected = plain.solve().unwrap();
        let mut rendered = Visual::new(tdse(7), small(None)).create().unwrap();
        assert_eq!(rendered.solve().unwrap(), expected);
    }

    #[test]
    fn writes_image_movie_and_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts
            = RunArtifacts::from_script("render_check.rs").unwrap()
            .in_dir(dir.path());
        let mut config = small(Some(artifacts.clone()));
        config.snapshots = true;
        let mut rendered = Visual::new(tdse(5), config).create().unwrap();
        rendered.solve().unwrap();
        assert!(artifacts.image_file().is_file());
        assert!(artifacts.movie_file().is_file());
        (0..4).for_each(|k| assert!(artifacts.snapshot_file(k).is_file()));
        assert!(!artifacts.snapshot_file(4).exists());
    }

    #[test]
    fn level_plots_render() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts
            = RunArtifacts::from_script("levels_check.rs").unwrap()
            .in_dir(dir.path());
        let mut config = small(Some(artifacts.clone()));
        config.plot_type = PlotType::Levels;
        let mut rendered = Visual::new(tise(), config).create().unwrap();
        let rec = rendered.solve().unwrap();
        assert_eq!(rec.energies.len(), 4);
        assert!(artifacts.image_file().is_file());
        assert!(artifacts.movie_file().is_file());
    }

    // emits `frames` frames, noting after each whether the media files exist,
    // then fails
    struct FailsLate {
        frames: usize,
        artifacts: RunArtifacts,
        seen: Vec<(bool, bool)>,
    }

    impl Solve for FailsLate {
        type Output = ();

        fn solve(&mut self) -> RunResult<()> { self.solve_with(&mut ()) }
    }

    impl Dynamics for FailsLate {
        const KIND: Kind = Kind::Tdse;

        fn set_initial_state(&mut self, _init: InitialState) -> RunResult<()> {
            Ok(())
        }

        fn solve_with(&mut self, observer: &mut dyn Observer) -> RunResult<()> {
            for k in 0..self.frames {
                let mut populations = vec![0.0; 3];
                populations[k % 3] = 1.0;
                let frame = Frame {
                    index: k,
                    label: k as f64,
                    populations,
                    expect: Expectations {
                        energy: 0.1,
                        norm: 1.0,
                        position: (k % 3) as f64,
                        spread: 0.0,
                    },
                };
                observer.observe(&frame)?;
                self.seen.push((
                    self.artifacts.image_file().is_file(),
                    self.artifacts.movie_file().is_file(),
                ));
            }
            Err(SolverError::NotBuilt.into())
        }

        fn n_site(&self) -> usize { 3 }
    }

    #[test]
    fn frames_are_rendered_while_solving() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts
            = RunArtifacts::from_script("fails_late.rs").unwrap()
            .in_dir(dir.path());
        let engine = FailsLate {
            frames: 3,
            artifacts: artifacts.clone(),
            seen: Vec::new(),
        };
        let mut rendered
            = Visual::new(engine, small(Some(artifacts.clone()))).create().unwrap();
        assert!(matches!(
            rendered.solve(), Err(RunError::Solver(SolverError::NotBuilt))));
        assert_eq!(rendered.dynamics().seen, vec![(true, true); 3]);
        assert!(artifacts.image_file().is_file());
        assert!(artifacts.movie_file().is_file());
        assert!(std::fs::metadata(artifacts.movie_file()).unwrap().len() > 0);
    }

    #[test]
    fn plot_options_read_from_yaml() {
        let config: PlotConfig
            = serde_yaml::from_str("{plot_type: levels, frame_rate: 2}").unwrap();
        assert_eq!(config.plot_type, PlotType::Levels);
        assert_eq!(config.frame_rate, 2);
        assert!(config.plot_expect);
        assert_eq!(config.figure_size, (1050, 450));
        assert!(config.outputs.is_none());
    }

    #[test]
    fn window_and_style_options_are_rejected() {
        for yaml in [
            "{figure_pos: [100, 100]}",
            "{plot_style: {scaling: 1.5}}",
            "{plot_type: positions2}",
        ] {
            assert!(serde_yaml::from_str::<PlotConfig>(yaml).is_err(), "{}", yaml);
        }
    }
}
