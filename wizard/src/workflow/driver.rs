use crate::workflow::input::StepInput;
use crate::workflow::playback::StatusSink;
use crate::workflow::runner::{MissionOutcome, Orchestrator, StepError};
use anyhow::Context;
use launchcore::MissionFlow;

/// Turns a failed step into an alert. Returns `None` when the step should be
/// asked again.
fn settle<T, I: StepInput>(result: Result<T, StepError>, input: &mut I) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            input.alert(&err.to_string());
            if input.retries() {
                Ok(None)
            } else {
                Err(err.into())
            }
        }
    }
}

/// Walks every wizard step in order until the mission report is ready.
pub async fn run_mission<I, S>(
    orchestrator: &mut Orchestrator,
    input: &mut I,
    sink: &mut S,
) -> anyhow::Result<MissionOutcome>
where
    I: StepInput,
    S: StatusSink,
{
    let flow = orchestrator.session().flow();
    orchestrator.prepare()?;

    if flow == MissionFlow::Catalog {
        loop {
            let answer = input.tle()?;
            if settle(orchestrator.submit_tle(answer).await, input)?.is_some() {
                break;
            }
        }
    }

    let window = *orchestrator
        .session()
        .window()
        .context("no launch window after catalogue step")?;
    loop {
        let raw = input.timestamp(&window)?;
        if settle(orchestrator.confirm_timestamp(&raw), input)?.is_some() {
            break;
        }
    }

    loop {
        let field = loop {
            let raw = input.orbit()?;
            if let Some(field) = settle(orchestrator.select_orbit(&raw), input)? {
                break field;
            }
        };
        let altitude = if field.locked {
            field.value.map(|km| km.to_string()).unwrap_or_default()
        } else {
            input.altitude(&field)?
        };
        if settle(orchestrator.confirm_orbit(field.orbit, &altitude).await, input)?.is_some() {
            break;
        }
    }

    let report = loop {
        let raw = input.rocket(orchestrator.session().rockets())?;
        if settle(orchestrator.confirm_rocket(&raw).await, input)?.is_none() {
            continue;
        }
        match flow {
            MissionFlow::Catalog => {
                if let Some(report) = settle(orchestrator.process_catalog().await, input)? {
                    break report;
                }
            }
            MissionFlow::Synthetic => {
                let report = loop {
                    let raw = input.debris_count()?;
                    if let Some(report) = settle(orchestrator.generate_debris(&raw).await, input)? {
                        break report;
                    }
                };
                break report;
            }
        }
    };

    Ok(orchestrator.finish(report, sink).await?)
}
