// src/cars/validators.rs

use super::models::{CarCategory, CarPatch, CreateCarRequest, NewCar, UpdateCarRequest};
use crate::common::helpers::coerce_price;
use crate::common::{ApiError, ValidationResult, Validator};
use serde_json::Value;

const MAX_NAME_LENGTH: usize = 120;

pub struct CarValidator;

fn check_price(result: &mut ValidationResult, price: &Value) -> Option<f64> {
    match coerce_price(price) {
        Some(p) if p > 0.0 => Some(p),
        Some(_) => {
            result.add_error("price", "Price must be greater than zero");
            None
        }
        None => {
            result.add_error("price", "Price must be a number");
            None
        }
    }
}

fn check_category(result: &mut ValidationResult, category: &str) -> Option<CarCategory> {
    match category.parse::<CarCategory>() {
        Ok(c) => Some(c),
        Err(msg) => {
            result.add_error("category", &msg);
            None
        }
    }
}

fn check_name_length(result: &mut ValidationResult, name: &str) {
    if name.trim().chars().count() > MAX_NAME_LENGTH {
        result.add_error("name", "Name must not exceed 120 characters");
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Validator<CreateCarRequest> for CarValidator {
    fn validate(&self, data: &CreateCarRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require_text("name", "Name", data.name.as_deref());
        result.require_text("category", "Category", data.category.as_deref());
        result.require_text("location", "Location", data.location.as_deref());
        result.require_text("imageUrl", "Image URL", data.image_url.as_deref());

        if let Some(name) = &data.name {
            check_name_length(&mut result, name);
        }

        match &data.price {
            None | Some(Value::Null) => result.add_error("price", "Price is required"),
            Some(price) => {
                check_price(&mut result, price);
            }
        }

        if let Some(category) = data.category.as_deref().filter(|c| !c.trim().is_empty()) {
            check_category(&mut result, category);
        }

        result
    }
}

impl Validator<UpdateCarRequest> for CarValidator {
    fn validate(&self, data: &UpdateCarRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Present fields must not be blanked out
        for (field, label, value) in [
            ("name", "Name", &data.name),
            ("category", "Category", &data.category),
            ("location", "Location", &data.location),
            ("imageUrl", "Image URL", &data.image_url),
        ] {
            if let Some(v) = value {
                result.require_text(field, label, Some(v.as_str()));
            }
        }

        if let Some(name) = &data.name {
            check_name_length(&mut result, name);
        }

        if let Some(price) = data.price.as_ref().filter(|p| !p.is_null()) {
            check_price(&mut result, price);
        }

        if let Some(category) = data.category.as_deref().filter(|c| !c.trim().is_empty()) {
            check_category(&mut result, category);
        }

        result
    }
}

impl CreateCarRequest {
    pub fn into_new_car(self) -> Result<NewCar, ApiError> {
        CarValidator.validate(&self).into_result()?;

        let missing = || ApiError::ValidationError("invalid car payload".to_string());

        Ok(NewCar {
            name: clean(self.name).ok_or_else(missing)?,
            category: self
                .category
                .as_deref()
                .and_then(|c| c.parse().ok())
                .ok_or_else(missing)?,
            price: self.price.as_ref().and_then(coerce_price).ok_or_else(missing)?,
            location: clean(self.location).ok_or_else(missing)?,
            image_url: clean(self.image_url).ok_or_else(missing)?,
            description: clean(self.description),
            provider_name: clean(self.provider_name),
        })
    }
}

impl UpdateCarRequest {
    pub fn into_patch(self) -> Result<CarPatch, ApiError> {
        CarValidator.validate(&self).into_result()?;

        Ok(CarPatch {
            name: clean(self.name),
            category: self.category.as_deref().and_then(|c| c.parse().ok()),
            price: self.price.as_ref().and_then(coerce_price),
            location: clean(self.location),
            image_url: clean(self.image_url),
            description: clean(self.description),
            provider_name: clean(self.provider_name),
        })
    }
}
