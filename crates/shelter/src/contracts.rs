//! Adoption contract documents.

use std::path::PathBuf;

use async_trait::async_trait;
use rescatando_config::ShelterConfig;
use rescatando_database::{Adopter, Animal, Contract};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to write contract document: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Rendering(String),
}

/// Everything printed on a contract.
#[derive(Debug, Clone)]
pub struct ContractContext {
    pub contract: Contract,
    pub adopter: Adopter,
    pub animal: Animal,
}

#[async_trait]
pub trait ContractRenderer: Send + Sync {
    /// Render the document and return the stored path.
    async fn render(&self, context: &ContractContext) -> Result<String, DocumentError>;

    async fn discard(&self, path: &str) -> Result<(), DocumentError>;
}

/// Writes contracts as UTF-8 text files under the configured directory.
pub struct TextContractRenderer {
    dir: PathBuf,
    shelter: ShelterConfig,
}

impl TextContractRenderer {
    pub fn new(dir: impl Into<PathBuf>, shelter: ShelterConfig) -> Self {
        Self {
            dir: dir.into(),
            shelter,
        }
    }

    fn file_name(context: &ContractContext) -> String {
        let adopter: String = context
            .adopter
            .profile
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("contract_{}_{}.txt", context.contract.id, adopter)
    }

    pub fn body(&self, context: &ContractContext) -> String {
        let ContractContext {
            contract,
            adopter,
            animal,
        } = context;
        let org = &self.shelter.organization_name;
        let profile = &adopter.profile;

        let clauses = [
            "The adopter commits to provide the animal with adequate food, veterinary care whenever needed and a safe, loving home.".to_string(),
            format!("The adopter accepts that {org} carries out periodic follow-ups to verify the wellbeing of the adopted animal."),
            "The adopter commits never to abandon, mistreat or neglect the animal under any circumstance.".to_string(),
            format!("If the adopter can no longer care for the animal, they will notify {org} immediately to arrange its return."),
            format!("The adopter acknowledges that any breach of these clauses may result in {org} recovering the animal."),
        ];

        let mut out = String::new();
        out.push_str("ADOPTION CONTRACT\n=================\n\n");
        out.push_str(&format!("Contract no.: {}\n", contract.id));
        out.push_str(&format!("Date: {}\n\n", contract.generated_on.format("%d %B %Y")));

        out.push_str("ADOPTER\n");
        out.push_str(&format!("  Full name: {}\n", profile.name));
        out.push_str(&format!("  Address:   {}, {}, {}\n", profile.address, profile.district, profile.city));
        out.push_str(&format!("  Phone:     {}\n", profile.phone));
        out.push_str(&format!("  Email:     {}\n\n", adopter.email));

        out.push_str("ADOPTED ANIMAL\n");
        out.push_str(&format!("  Name:    {}\n", animal.name));
        out.push_str(&format!("  Species: {}\n", animal.species));
        out.push_str(&format!("  Age:     {} years\n", animal.age));
        out.push_str(&format!("  Sex:     {}\n", animal.sex));
        out.push_str(&format!("  Health:  {}\n\n", animal.health_status));

        out.push_str("CLAUSES\n");
        for (i, clause) in clauses.iter().enumerate() {
            out.push_str(&format!("  {}. {clause}\n", i + 1));
        }
        out.push('\n');

        out.push_str(&format!("Care commitment: {}\n", contract.care_commitment));
        out.push_str(&format!(
            "Follow-up visits accepted: {}\n\n",
            if contract.accepts_follow_up { "yes" } else { "no" }
        ));
        out.push_str(
            "The adopter declares having read and accepted every clause of this contract and commits to fulfil them in full.\n\n",
        );

        out.push_str("_______________________    _______________________\n");
        out.push_str(&format!("Adopter signature          {org} signature\n"));
        out.push_str(&format!("{:<27}Legal representative\n", profile.name));
        out
    }
}

#[async_trait]
impl ContractRenderer for TextContractRenderer {
    async fn render(&self, context: &ContractContext) -> Result<String, DocumentError> {
        if context.adopter.profile.name.trim().is_empty() {
            return Err(DocumentError::Rendering(format!(
                "contract {} has no adopter name",
                context.contract.id
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(Self::file_name(context));
        tokio::fs::write(&path, self.body(context)).await?;

        let path = path.display().to_string();
        info!(contract_id = context.contract.id, path = %path, "rendered contract document");
        Ok(path)
    }

    async fn discard(&self, path: &str) -> Result<(), DocumentError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!(path, "removed contract document");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
