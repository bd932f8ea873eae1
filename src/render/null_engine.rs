use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{ChartConfig, SeriesData};
use crate::error::{ChartError, ChartResult};
use crate::render::{ChartEngine, EngineHandle};

/// Engine call recorded by `NullEngine`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineCall {
    Construct {
        handle: u64,
        element_id: String,
        config: ChartConfig,
    },
    Render {
        handle: u64,
    },
    UpdateSeries {
        handle: u64,
        data: SeriesData,
    },
    Destroy {
        handle: u64,
    },
}

#[derive(Debug, Default)]
struct EngineJournal {
    next_handle: u64,
    calls: Vec<EngineCall>,
    live: BTreeSet<u64>,
}

/// Headless engine used by tests and hosts without a drawing backend.
///
/// It still validates configs the way a real engine would reject them, and
/// records every call in a journal shared by all clones.
#[derive(Debug, Clone, Default)]
pub struct NullEngine {
    journal: Rc<RefCell<EngineJournal>>,
}

impl NullEngine {
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.journal.borrow().calls.clone()
    }

    #[must_use]
    pub fn constructed_count(&self) -> usize {
        self.count_calls(|call| matches!(call, EngineCall::Construct { .. }))
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.count_calls(|call| matches!(call, EngineCall::Render { .. }))
    }

    #[must_use]
    pub fn destroyed_count(&self) -> usize {
        self.count_calls(|call| matches!(call, EngineCall::Destroy { .. }))
    }

    #[must_use]
    pub fn live_handles(&self) -> Vec<u64> {
        self.journal.borrow().live.iter().copied().collect()
    }

    /// Config the given handle was constructed with.
    #[must_use]
    pub fn config_of(&self, handle: u64) -> Option<ChartConfig> {
        self.journal
            .borrow()
            .calls
            .iter()
            .find_map(|call| match call {
                EngineCall::Construct {
                    handle: id, config, ..
                } if *id == handle => Some(config.clone()),
                _ => None,
            })
    }

    /// Series updates applied to `handle`, in call order.
    #[must_use]
    pub fn updates_for(&self, handle: u64) -> Vec<SeriesData> {
        self.journal
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::UpdateSeries { handle: id, data } if *id == handle => {
                    Some(data.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn count_calls(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.journal
            .borrow()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }
}

fn validate_config(config: &ChartConfig) -> ChartResult<()> {
    let Value::Object(fields) = config.as_value() else {
        return Err(ChartError::EngineConstruction(
            "config must be a JSON object".to_owned(),
        ));
    };
    match fields.get("series") {
        None | Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(ChartError::EngineConstruction(
            "config `series` must be an array".to_owned(),
        )),
    }
}

impl ChartEngine for NullEngine {
    type Handle = NullChartHandle;

    fn construct(&mut self, element_id: &str, config: ChartConfig) -> ChartResult<NullChartHandle> {
        validate_config(&config)?;

        let mut journal = self.journal.borrow_mut();
        journal.next_handle += 1;
        let id = journal.next_handle;
        journal.live.insert(id);
        journal.calls.push(EngineCall::Construct {
            handle: id,
            element_id: element_id.to_owned(),
            config: config.clone(),
        });

        Ok(NullChartHandle {
            id,
            journal: Rc::clone(&self.journal),
            config,
            series: None,
            destroyed: false,
        })
    }
}

#[derive(Debug)]
pub struct NullChartHandle {
    id: u64,
    journal: Rc<RefCell<EngineJournal>>,
    config: ChartConfig,
    series: Option<SeriesData>,
    destroyed: bool,
}

impl NullChartHandle {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn series(&self) -> Option<&SeriesData> {
        self.series.as_ref()
    }

    fn ensure_live(&self) -> ChartResult<()> {
        if self.destroyed {
            return Err(ChartError::EngineUpdate(format!(
                "chart handle {} was destroyed",
                self.id
            )));
        }
        Ok(())
    }
}

impl EngineHandle for NullChartHandle {
    fn render(&mut self) -> ChartResult<()> {
        self.ensure_live()?;
        self.journal
            .borrow_mut()
            .calls
            .push(EngineCall::Render { handle: self.id });
        Ok(())
    }

    fn update_series(&mut self, data: SeriesData) -> ChartResult<()> {
        self.ensure_live()?;
        self.journal.borrow_mut().calls.push(EngineCall::UpdateSeries {
            handle: self.id,
            data: data.clone(),
        });
        self.series = Some(data);
        Ok(())
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let mut journal = self.journal.borrow_mut();
        journal.live.remove(&self.id);
        journal.calls.push(EngineCall::Destroy { handle: self.id });
    }
}
