//! The two-phase data negotiation: sheet preparation, then prefill.

use crate::error::WidgetError;
use crate::expression::Expression;
use crate::page::{Page, WidgetEvent, WidgetEventKind};
use crate::sheet::{is_empty_value, Condition, DataSheet};
use crate::uxon::UxonObject;
use crate::widget::{NegotiationPhase, PrefillAction, WidgetId};

impl Page {
    /// Adds what the widget (and its subtree) needs to render to `sheet`, or to a new sheet for the
    /// widget's object.
    pub fn prepare_data_sheet_to_read(&self, widget: WidgetId, sheet: Option<DataSheet>) -> Result<DataSheet, WidgetError> {
        let sheet = match sheet {
            Some(s) => s,
            None => DataSheet::new(self.meta_object(widget)?),
        };
        self.start_round(widget)?;
        let node = self.node(widget)?;
        node.core.phase.set(NegotiationPhase::Preparing);
        node.kind.prepare_data_sheet_to_read(self, widget, sheet)
    }

    /// Adds what the widget needs to be prefilled from `sheet`. If the sheet is based on another object,
    /// widgets relate it to their own object where a direct relation allows.
    pub fn prepare_data_sheet_to_prefill(&self, widget: WidgetId, sheet: Option<DataSheet>) -> Result<DataSheet, WidgetError> {
        let sheet = match sheet {
            Some(s) => s,
            None => DataSheet::new(self.meta_object(widget)?),
        };
        let node = self.node(widget)?;
        if node.core.do_not_prefill {
            return Ok(sheet);
        }
        self.start_round(widget)?;
        node.core.phase.set(NegotiationPhase::Preparing);
        node.kind.prepare_data_sheet_to_prefill(self, widget, sheet)
    }

    /// A widget that finished an earlier round goes back to `Idle`, together with its subtree.
    fn start_round(&self, widget: WidgetId) -> Result<(), WidgetError> {
        let core = &self.node(widget)?.core;
        if core.phase.get() != NegotiationPhase::Filled {
            return Ok(());
        }
        core.phase.set(NegotiationPhase::Idle);
        for w in self.children_recursive(widget)? {
            self.node(w)?.core.phase.set(NegotiationPhase::Idle);
        }
        Ok(())
    }

    /// Prefills the widget from `sheet`: fires `BeforePrefill`, records the sheet, lets the widget kind
    /// compute its changes, applies them and fires `Prefill`. Widgets with prefill disabled are skipped.
    pub fn prefill(&mut self, widget: WidgetId, sheet: &DataSheet) -> Result<(), WidgetError> {
        let node = self.node(widget)?;
        if node.core.do_not_prefill {
            tracing::debug!(widget = %node.describe(), "prefill disabled, skipping");
            return Ok(());
        }
        let widget_id = node.core.id.clone();
        let object_alias = sheet.meta_object().alias_with_namespace();
        self.events.dispatch(&WidgetEvent {
            kind: WidgetEventKind::BeforePrefill,
            widget,
            widget_id: widget_id.clone(),
            object_alias: object_alias.clone(),
        });

        let node = self.node_mut(widget)?;
        node.core.phase.set(NegotiationPhase::Prefilling);
        node.core.prefill_source = Some(sheet.clone());

        let node = self.node(widget)?;
        let actions = node.kind.do_prefill(self, widget, sheet)?;
        tracing::debug!(widget = %node.describe(), actions = actions.len(), rows = sheet.row_count(), "prefill");
        for action in actions {
            self.apply_prefill_action(action, sheet)?;
        }

        self.node(widget)?.core.phase.set(NegotiationPhase::Filled);
        self.events.dispatch(&WidgetEvent {
            kind: WidgetEventKind::Prefill,
            widget,
            widget_id,
            object_alias,
        });
        Ok(())
    }

    fn apply_prefill_action(&mut self, action: PrefillAction, sheet: &DataSheet) -> Result<(), WidgetError> {
        match action {
            PrefillAction::SetValue { widget, value } => {
                let target = self.value_target(widget)?;
                let expression = if is_empty_value(&value) {
                    Expression::Empty
                } else {
                    Expression::Literal(value)
                };
                let node = self.node_mut(target)?;
                match node.kind.as_value_mut() {
                    Some(v) => v.set_value(expression),
                    None => tracing::warn!(widget = %node.describe(), "cannot set a value on this widget"),
                }
            }
            PrefillAction::SetValueText { widget, text } => {
                let target = self.value_target(widget)?;
                if let Some(v) = self.node_mut(target)?.kind.as_value_mut() {
                    v.set_value_text(text);
                }
            }
            PrefillAction::AddFilter {
                data,
                attribute_alias,
                comparator,
                value,
            } => {
                let mut uxon = UxonObject::new();
                uxon.set_property("widget_type", "Filter")
                    .set_property("attribute_alias", attribute_alias)
                    .set_property("comparator", comparator.as_str())
                    .set_property("value", value)
                    .set_property("visibility", "hidden");
                let filter = self.create_in_slot(Some(data), Some("filters"), &uxon, "Filter")?;
                tracing::debug!(filter = %self.node(filter)?.describe(), "hidden prefill filter added");
            }
            PrefillAction::SetFilter {
                filter,
                comparator,
                value,
            } => {
                let node = self.node_mut(filter)?;
                match node.kind.as_filter_mut() {
                    Some(f) => f.set_comparator(comparator),
                    None => tracing::warn!(widget = %node.describe(), "not a filter, comparator left as is"),
                }
                self.apply_prefill_action(PrefillAction::SetValue { widget: filter, value }, sheet)?;
            }
            PrefillAction::Prefill { widget } => self.prefill(widget, sheet)?,
        }
        Ok(())
    }

    /// Values given to a filter go to its input widget.
    fn value_target(&self, widget: WidgetId) -> Result<WidgetId, WidgetError> {
        let node = self.node(widget)?;
        match node.kind.as_filter() {
            Some(f) => f.input_widget().ok_or_else(|| WidgetError::Configuration {
                widget: node.describe(),
                message: "filter has no input widget".into(),
            }),
            None => Ok(widget),
        }
    }

    /// The condition a filter widget currently applies, if its input holds a value.
    pub fn filter_condition(&self, filter: WidgetId) -> Result<Option<Condition>, WidgetError> {
        let node = self.node(filter)?;
        let Some(f) = node.kind.as_filter() else {
            return Ok(None);
        };
        let (Some(alias), Some(input)) = (f.attribute_alias(), f.input_widget()) else {
            return Ok(None);
        };
        let value = match self.node(input)?.kind.as_value().map(|v| v.value()) {
            Some(Expression::Literal(v)) if !is_empty_value(v) => v.clone(),
            _ => return Ok(None),
        };
        Ok(Some(Condition::new(alias, f.comparator(), value)))
    }
}
