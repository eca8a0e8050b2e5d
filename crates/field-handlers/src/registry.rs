use crate::{
    handler::FieldHandler,
    handlers::{
        checkbox::CheckboxHandler,
        generic::GenericHandler,
        json::JsonHandler,
        number::NumberHandler,
        rating::RatingHandler,
        select::{MultiSelectHandler, SingleSelectHandler},
        temporal::{DateHandler, DateTimeHandler},
        text::TextHandler,
        time::TimeHandler,
    },
};
use model::schema::ui_type::UiType;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Maps UI types to their filter handlers.
pub struct HandlerRegistry {
    handlers: HashMap<UiType, Arc<dyn FieldHandler>>,
    fallback: Arc<dyn FieldHandler>,
}

impl HandlerRegistry {
    /// Create a registry with all built-in handlers
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            fallback: Arc::new(GenericHandler),
        };

        let text: Arc<dyn FieldHandler> = Arc::new(TextHandler);
        for ui_type in [
            UiType::SingleLineText,
            UiType::LongText,
            UiType::Email,
            UiType::PhoneNumber,
        ] {
            registry.register(ui_type, text.clone());
        }

        let number: Arc<dyn FieldHandler> = Arc::new(NumberHandler);
        for ui_type in [
            UiType::Number,
            UiType::Decimal,
            UiType::Currency,
            UiType::Percent,
            UiType::Duration,
            UiType::Year,
        ] {
            registry.register(ui_type, number.clone());
        }

        let date_time: Arc<dyn FieldHandler> = Arc::new(DateTimeHandler);
        for ui_type in [
            UiType::DateTime,
            UiType::CreatedTime,
            UiType::LastModifiedTime,
        ] {
            registry.register(ui_type, date_time.clone());
        }

        registry.register(UiType::Rating, Arc::new(RatingHandler));
        registry.register(UiType::Checkbox, Arc::new(CheckboxHandler));
        registry.register(UiType::SingleSelect, Arc::new(SingleSelectHandler));
        registry.register(UiType::MultiSelect, Arc::new(MultiSelectHandler));
        registry.register(UiType::Date, Arc::new(DateHandler));
        registry.register(UiType::Time, Arc::new(TimeHandler));
        registry.register(UiType::Json, Arc::new(JsonHandler));

        registry
    }

    /// Replaces the handler for `ui_type`.
    pub fn register(&mut self, ui_type: UiType, handler: Arc<dyn FieldHandler>) {
        self.handlers.insert(ui_type, handler);
    }

    /// Handler for `ui_type`, or the generic fallback.
    pub fn handler_for(&self, ui_type: &UiType) -> &dyn FieldHandler {
        match self.handlers.get(ui_type) {
            Some(handler) => &**handler,
            None => {
                debug!("No handler for {}, using {}", ui_type, self.fallback.name());
                &*self.fallback
            }
        }
    }

    pub fn has_handler(&self, ui_type: &UiType) -> bool {
        self.handlers.contains_key(ui_type)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
