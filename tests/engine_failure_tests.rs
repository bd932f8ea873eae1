use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chart_hook::ChartError;
use chart_hook::ChartResult;
use chart_hook::api::{BindingOptions, BindingPhase, ChartBinding};
use chart_hook::channel::{LocalChannelHub, PayloadCallback, SubscriptionId, UpdateChannel};
use chart_hook::core::{ChartConfig, Element, HostElement, SeriesData, UpdatePayload};
use chart_hook::extensions::{BindingContext, BindingEvent, BindingObserver};
use chart_hook::render::{ChartEngine, EngineHandle, NullEngine};
use serde_json::json;

type Log = Rc<RefCell<Vec<String>>>;

/// Engine whose handles refuse to render while `fail_render` is set.
#[derive(Clone, Default)]
struct FlakyRenderEngine {
    log: Log,
    fail_render: Rc<Cell<bool>>,
    next_id: u64,
}

struct FlakyHandle {
    id: u64,
    log: Log,
    fail_render: Rc<Cell<bool>>,
    destroyed: bool,
}

impl ChartEngine for FlakyRenderEngine {
    type Handle = FlakyHandle;

    fn construct(&mut self, _element_id: &str, _config: ChartConfig) -> ChartResult<FlakyHandle> {
        self.next_id += 1;
        self.log.borrow_mut().push(format!("construct {}", self.next_id));
        Ok(FlakyHandle {
            id: self.next_id,
            log: Rc::clone(&self.log),
            fail_render: Rc::clone(&self.fail_render),
            destroyed: false,
        })
    }
}

impl EngineHandle for FlakyHandle {
    fn render(&mut self) -> ChartResult<()> {
        if self.fail_render.get() {
            return Err(ChartError::EngineConstruction("render refused".to_owned()));
        }
        self.log.borrow_mut().push(format!("render {}", self.id));
        Ok(())
    }

    fn update_series(&mut self, _data: SeriesData) -> ChartResult<()> {
        self.log.borrow_mut().push(format!("update {}", self.id));
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.log.borrow_mut().push(format!("destroy {}", self.id));
        }
    }
}

/// Transport that is never reachable.
struct OfflineChannel;

impl UpdateChannel for OfflineChannel {
    fn subscribe(
        &mut self,
        _channel: &str,
        _callback: PayloadCallback,
    ) -> ChartResult<SubscriptionId> {
        Err(ChartError::InvalidData("transport offline".to_owned()))
    }

    fn unsubscribe(&mut self, _id: SubscriptionId) -> bool {
        false
    }
}

/// Transport that replays buffered payloads synchronously on subscribe.
#[derive(Default)]
struct ReplayingChannel {
    backlog: Vec<UpdatePayload>,
    callbacks: Vec<PayloadCallback>,
}

impl UpdateChannel for ReplayingChannel {
    fn subscribe(
        &mut self,
        _channel: &str,
        mut callback: PayloadCallback,
    ) -> ChartResult<SubscriptionId> {
        for payload in self.backlog.drain(..) {
            callback(payload);
        }
        self.callbacks.push(callback);
        Ok(SubscriptionId(self.callbacks.len() as u64))
    }

    fn unsubscribe(&mut self, _id: SubscriptionId) -> bool {
        true
    }
}

struct EventLog {
    events: Rc<RefCell<Vec<BindingEvent>>>,
}

impl BindingObserver for EventLog {
    fn id(&self) -> &str {
        "event-log"
    }

    fn on_event(&mut self, event: &BindingEvent, _context: BindingContext) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn rejections(events: &Rc<RefCell<Vec<BindingEvent>>>) -> usize {
    events
        .borrow()
        .iter()
        .filter(|event| matches!(event, BindingEvent::ConfigRejected { .. }))
        .count()
}

fn chart_element(id: &str) -> Element {
    Element::new(id).with_attribute("data-chart", r#"{"type":"line"}"#)
}

#[test]
fn render_failure_on_attach_leaves_no_partial_chart() {
    let engine = FlakyRenderEngine::default();
    engine.fail_render.set(true);
    let hub = LocalChannelHub::new();
    let mut binding = ChartBinding::new(engine.clone(), hub.clone(), BindingOptions::default())
        .expect("binding init");
    let events = Rc::new(RefCell::new(Vec::new()));
    binding
        .register_observer(Box::new(EventLog {
            events: Rc::clone(&events),
        }))
        .expect("register observer");
    let mut element = chart_element("chart-1");

    let err = binding.on_attach(&mut element).expect_err("render must fail");

    assert!(matches!(err, ChartError::EngineConstruction(_)));
    assert_eq!(*engine.log.borrow(), vec!["construct 1", "destroy 1"]);
    assert_eq!(binding.phase(), BindingPhase::Unattached);
    assert!(!binding.has_live_handle());
    assert!(!binding.is_subscribed());
    assert_eq!(hub.subscription_count(), 0);
    let stats = binding.stats();
    assert_eq!(stats.constructed, 1);
    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.config_failures, 1);
    assert_eq!(rejections(&events), 1);
    assert!(element.has_attribute("data-chart-error"));
}

#[test]
fn render_failure_on_update_faults_until_render_recovers() {
    let engine = FlakyRenderEngine::default();
    let hub = LocalChannelHub::new();
    let mut binding = ChartBinding::new(engine.clone(), hub.clone(), BindingOptions::default())
        .expect("binding init");
    let events = Rc::new(RefCell::new(Vec::new()));
    binding
        .register_observer(Box::new(EventLog {
            events: Rc::clone(&events),
        }))
        .expect("register observer");
    let mut element = chart_element("chart-1");
    binding.on_attach(&mut element).expect("attach");

    engine.fail_render.set(true);
    element.set_attribute("data-chart", r#"{"type":"bar"}"#.to_owned());
    let err = binding
        .on_structural_update(&mut element)
        .expect_err("render must fail");

    assert!(matches!(err, ChartError::EngineConstruction(_)));
    assert_eq!(
        *engine.log.borrow(),
        vec!["construct 1", "render 1", "destroy 1", "construct 2", "destroy 2"]
    );
    assert_eq!(binding.phase(), BindingPhase::Faulted);
    assert!(!binding.has_live_handle());
    assert_eq!(hub.subscriber_count("charts:chart-1"), 1);
    assert_eq!(binding.stats().config_failures, 1);
    assert_eq!(rejections(&events), 1);
    assert!(element.has_attribute("data-chart-error"));

    engine.fail_render.set(false);
    element.set_attribute("data-chart", r#"{"type":"area"}"#.to_owned());
    binding.on_structural_update(&mut element).expect("recover");

    assert_eq!(binding.phase(), BindingPhase::Live);
    assert_eq!(binding.generation(), 2);
    assert!(!element.has_attribute("data-chart-error"));
}

#[test]
fn subscribe_failure_on_attach_destroys_the_new_handle() {
    let engine = NullEngine::default();
    let mut binding = ChartBinding::new(engine.clone(), OfflineChannel, BindingOptions::default())
        .expect("binding init");
    let mut element = chart_element("chart-1");

    let err = binding.on_attach(&mut element).expect_err("subscribe must fail");

    assert_eq!(err, ChartError::InvalidData("transport offline".to_owned()));
    assert_eq!(engine.constructed_count(), 1);
    assert_eq!(engine.destroyed_count(), 1);
    assert!(engine.live_handles().is_empty());
    assert_eq!(binding.phase(), BindingPhase::Unattached);
    assert!(!binding.has_live_handle());
    assert!(!binding.is_subscribed());
    assert_eq!(binding.generation(), 0);
    assert_eq!(binding.channel_name(), None);
    assert!(element.has_attribute("data-chart-error"));

    let err = binding
        .on_structural_update(&mut chart_element("chart-1"))
        .expect_err("never attached");
    assert!(matches!(err, ChartError::InvalidLifecycle { .. }));
    assert_eq!(engine.constructed_count(), 1);
}

#[test]
fn payloads_replayed_during_subscribe_reach_the_new_handle() {
    let engine = NullEngine::default();
    let channel = ReplayingChannel {
        backlog: vec![UpdatePayload::new(json!({"data": [42]}))],
        ..ReplayingChannel::default()
    };
    let mut binding = ChartBinding::new(engine.clone(), channel, BindingOptions::default())
        .expect("binding init");
    let mut element = chart_element("chart-1");

    binding.on_attach(&mut element).expect("attach");

    assert_eq!(engine.updates_for(1), vec![SeriesData::new(json!([42]))]);
    let stats = binding.stats();
    assert_eq!(stats.updates_applied, 1);
    assert_eq!(stats.payloads_dropped, 0);
    assert_eq!(binding.phase(), BindingPhase::Live);
}
