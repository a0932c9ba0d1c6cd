use crate::domain::model::{NewService, Service};
use crate::utils::error::{AssistantError, Result};

/// A provider's own catalog of offered services.
#[derive(Debug, Default)]
pub struct ServiceCatalog {
    services: Vec<Service>,
    next_id: u64,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, new: NewService) -> Result<Service> {
        if new.name.trim().is_empty() {
            return Err(AssistantError::ValidationError {
                message: "service name cannot be empty".to_string(),
            });
        }
        if !new.price.is_finite() || new.price <= 0.0 {
            return Err(AssistantError::ValidationError {
                message: "service price must be greater than zero".to_string(),
            });
        }

        self.next_id += 1;
        let service = Service {
            id: self.next_id.to_string(),
            name: new.name.trim().to_string(),
            price: new.price,
            description: new.description,
        };
        self.services.push(service.clone());
        Ok(service)
    }

    pub fn remove(&mut self, id: &str) -> Result<Service> {
        let index = self
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AssistantError::NotFoundError {
                entity: "service".to_string(),
                id: id.to_string(),
            })?;
        Ok(self.services.remove(index))
    }

    pub fn list(&self) -> &[Service] {
        &self.services
    }
}
