mod opt_common;
mod opt_ptcheck;

use std::path::Path;

use anyhow::{Context, Result};
use jetimages::{
    dataset::version_tag,
    event::Event,
    matching::Matcher,
    output::{ensure_dir, OutputDir},
    plot::{
        palette_colour, save, Annotation, Marker, PlotFormat, Scatter,
        ScatterSeries,
    },
    progress_bar::{Progress, ProgressBar},
    ptcheck::{check_jets, nonzero_candidates, PtCheck},
    reader::{Collections, EventLoader},
};
use log::{debug, info};

use crate::opt_common::{open_input, parse_args};
use crate::opt_ptcheck::Opt;

/// Vertical offsets of the annotations, away from the closer φ edge
fn annotation_offsets(phi: f64) -> [f64; 3] {
    if phi < 0. {
        [0.3, 0.6, 0.9]
    } else {
        [-0.5, -0.8, -1.1]
    }
}

fn annotations(check: &PtCheck) -> [Annotation; 3] {
    let (eta, phi) = (check.jet.eta, check.jet.phi);
    let [nano, pf, diff] = annotation_offsets(phi);
    [
        Annotation {
            pos: (eta, phi + nano),
            text: format!("pT^Nano = {:.3} GeV", check.raw_pt),
        },
        Annotation {
            pos: (eta, phi + pf),
            text: format!("pT^PF = {:.3} GeV", check.pf_pt),
        },
        Annotation {
            pos: (eta, phi + diff),
            text: format!("Diff: {:.3} %", check.diff_percent()),
        },
    ]
}

fn plot_event(
    ievent: usize,
    event: &Event,
    matcher: &Matcher,
    outdir: &Path,
    format: PlotFormat,
) -> Result<()> {
    let jets = matcher.matched_subset(&event.jets, &event.gen_jets);
    let cands = nonzero_candidates(&event.pf_candidates);
    let checks = check_jets(&jets, &cands, matcher);

    let jet_points = jets.iter().map(|j| (j.eta, j.phi)).collect();
    let mut series = vec![ScatterSeries::new(
        jet_points,
        Marker::Cross,
        palette_colour(0),
    )
    .with_label("NanoAOD GEN-Matched Jets")];
    let mut annos = Vec::new();
    for (ijet, check) in checks.iter().enumerate() {
        debug!(
            "event {ievent}, jet {ijet}: raw pt {:.3}, PF pt {:.3}",
            check.raw_pt, check.pf_pt
        );
        let points = check.constituents.iter().map(|c| (c.eta, c.phi)).collect();
        series.push(
            ScatterSeries::new(points, Marker::Circle, palette_colour(ijet + 1))
                .with_label(format!("PF Candidates: Jet {ijet}")),
        );
        annos.extend(annotations(check));
    }

    let plot = Scatter::builder()
        .series(series)
        .x_label("Jet η")
        .y_label("Jet φ")
        .xlim((-5., 5.))
        .ylim((-3.5, 3.5))
        .annotations(annos)
        .corner_text(format!("ievent={ievent}"))
        .build();
    let path = save(&plot, outdir.join(format!("ievent_{ievent}")), format)?;
    debug!("Wrote {path:?}");
    Ok(())
}

fn main() -> Result<()> {
    let opt: Opt = parse_args()?;
    opt.common.init("jetimages-ptcheck");
    debug!("settings: {:#?}", opt);
    let config = opt.common.config()?;

    let tag = opt
        .infile
        .parent()
        .and_then(|dir| dir.file_name())
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();
    let version = version_tag(&opt.infile);
    let outdir = OutputDir::new(&tag).ptcheck(version.as_deref());
    let outdir = ensure_dir(&outdir)
        .with_context(|| format!("Failed to create output directory {outdir:?}"))?;

    let mut source = open_input(&opt.infile)?;
    let events = EventLoader::builder()
        .branches(config.branches.clone())
        .collections(Collections {
            jets: true,
            jet_raw_factor: true,
            gen_jets: true,
            pf_candidates: true,
            ..Default::default()
        })
        .build()
        .load(&mut source)
        .with_context(|| format!("Failed to load events from {:?}", opt.infile))?;

    let matcher = Matcher::new(config.delta_r_cut);
    let nevents = opt.numevents.min(events.len());
    if nevents < opt.numevents {
        info!("Only {nevents} events available");
    }
    let progress = ProgressBar::new(nevents as u64, "Checking:");
    for (ievent, event) in events.iter().take(nevents).enumerate() {
        plot_event(ievent, event, &matcher, &outdir, opt.common.format)?;
        progress.inc(1);
    }
    progress.finish();
    info!("Wrote {nevents} plots to {outdir:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetimages::jet::Jet;

    #[test]
    fn annotations_away_from_edge() {
        let check = PtCheck {
            jet: Jet::new(100., 1., -2., 10.),
            raw_pt: 100.,
            pf_pt: 90.,
            constituents: Vec::new(),
        };
        let [nano, pf, diff] = annotations(&check);
        assert!((nano.pos.1 + 1.7).abs() < 1e-12);
        assert!((diff.pos.1 + 1.1).abs() < 1e-12);
        assert_eq!(pf.text, "pT^PF = 90.000 GeV");
        assert_eq!(diff.text, "Diff: 10.000 %");

        assert_eq!(annotation_offsets(0.), [-0.5, -0.8, -1.1]);
    }
}
