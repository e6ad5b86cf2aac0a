//! Deck session — the scroll controller plus the panels of the open workflow.

use std::time::Instant;

use crate::core::content::{digital_twin, materials, Section, WorkflowId, IMPACT_METRICS};
use crate::core::controller::{ScrollConfig, ScrollController};
use crate::core::counter::{CounterSpec, ImpactCounters};
use crate::core::molecules::{MoleculeBench, OWNED_SECTIONS};
use crate::core::panel::{FadeWindows, PanelSlot, StaticPanel};
use crate::core::twin::TwinLab;

/// Interactive panels of one workflow.
#[derive(Debug)]
pub enum Panels {
    None,
    Materials {
        bench: PanelSlot<MoleculeBench>,
        industries: PanelSlot<StaticPanel>,
        impact: PanelSlot<ImpactCounters>,
    },
    DigitalTwin {
        lab: PanelSlot<TwinLab>,
    },
}

impl Panels {
    pub fn for_workflow(workflow: WorkflowId) -> Self {
        match workflow {
            WorkflowId::Materials => {
                let specs = IMPACT_METRICS
                    .iter()
                    .map(|m| CounterSpec {
                        target: m.target,
                        decimals: m.decimals,
                        suffix: m.suffix,
                    })
                    .collect();
                Panels::Materials {
                    bench: PanelSlot::new(
                        MoleculeBench::new(),
                        OWNED_SECTIONS,
                        FadeWindows::CROSSFADE,
                    ),
                    industries: PanelSlot::new(
                        StaticPanel,
                        [materials::INDUSTRIES],
                        FadeWindows::LATE_IN_EARLY_OUT,
                    ),
                    impact: PanelSlot::new(
                        ImpactCounters::new(specs),
                        [materials::IMPACT],
                        FadeWindows::LATE_IN_EARLY_OUT,
                    ),
                }
            }
            WorkflowId::DigitalTwin => Panels::DigitalTwin {
                lab: PanelSlot::new(
                    TwinLab::new(),
                    digital_twin::LAB_SECTIONS,
                    FadeWindows::CROSSFADE,
                ),
            },
            WorkflowId::Home | WorkflowId::Spectra => Panels::None,
        }
    }

    fn update(&mut self, controller: &ScrollController, now: Instant) {
        let progress = controller.progress();
        match self {
            Panels::None => {}
            Panels::Materials {
                bench,
                industries,
                impact,
            } => {
                bench.update(progress, now);
                industries.update(progress, now);
                impact.update(progress, now);
            }
            Panels::DigitalTwin { lab } => lab.update(progress, now),
        }
    }

    fn leave_all(&mut self) {
        match self {
            Panels::None => {}
            Panels::Materials {
                bench,
                industries,
                impact,
            } => {
                bench.leave();
                industries.leave();
                impact.leave();
            }
            Panels::DigitalTwin { lab } => lab.leave(),
        }
    }

    /// The molecule bench, only while it is mounted.
    pub fn bench_mut(&mut self) -> Option<&mut MoleculeBench> {
        match self {
            Panels::Materials { bench, .. } => bench.panel_mut(),
            _ => None,
        }
    }

    /// The digital-twin lab, only while it is mounted.
    pub fn twin_mut(&mut self) -> Option<&mut TwinLab> {
        match self {
            Panels::DigitalTwin { lab } => lab.panel_mut(),
            _ => None,
        }
    }
}

/// One workflow being browsed.
#[derive(Debug)]
pub struct DeckState {
    pub workflow: WorkflowId,
    pub controller: ScrollController,
    pub panels: Panels,
    /// Frames rendered since the deck opened (drives spinners).
    pub frame_tick: u64,
}

impl DeckState {
    pub fn new(workflow: WorkflowId, config: ScrollConfig) -> Self {
        Self {
            workflow,
            controller: ScrollController::new(workflow.sections().len(), config),
            panels: Panels::for_workflow(workflow),
            frame_tick: 0,
        }
    }

    pub fn sections(&self) -> &'static [Section] {
        self.workflow.sections()
    }

    /// Switch to another workflow.  Panels of the old one leave, the
    /// controller starts over at the first section.
    pub fn open(&mut self, workflow: WorkflowId) {
        tracing::debug!("opening workflow {:?}", workflow);
        self.panels.leave_all();
        self.workflow = workflow;
        self.controller.reset(workflow.sections().len());
        self.panels = Panels::for_workflow(workflow);
        self.frame_tick = 0;
    }

    /// Leave the deck (back to the home screen).
    pub fn close(&mut self) {
        self.open(WorkflowId::Home);
    }

    /// The deck area is now `width` columns wide.  A zero-width area
    /// detaches the controller until the deck is visible again.
    pub fn layout(&mut self, width: u16) {
        if width == 0 {
            if self.controller.client_width().is_some() {
                self.controller.unmount();
            }
            return;
        }
        self.controller.mount(f64::from(width));
    }

    /// Run one animation frame.  Returns `true` when the scroll state moved.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        self.frame_tick = self.frame_tick.wrapping_add(1);
        let changed = self.controller.frame(now);
        self.panels.update(&self.controller, now);
        changed
    }

    /// Whether the active section has a panel that takes keyboard focus.
    pub fn active_panel_focusable(&self) -> bool {
        let index = self.controller.active_index();
        match self.workflow {
            WorkflowId::Materials => OWNED_SECTIONS.contains(&index),
            WorkflowId::DigitalTwin => index != digital_twin::TRAIN,
            WorkflowId::Home | WorkflowId::Spectra => false,
        }
    }
}
