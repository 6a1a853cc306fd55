//! Plain-text bodies for the notification emails.

use chrono::NaiveDateTime;
use rescatando_config::ShelterConfig;
use rescatando_database::{VolunteerApplication, VolunteerTeam};

use crate::mailer::EmailMessage;

fn signature(shelter: &ShelterConfig) -> String {
    format!(
        "If you have any questions, reach us on Instagram at {}.\n\nWith love,\nThe {} team",
        shelter.contact_handle, shelter.organization_name
    )
}

fn optional_line(label: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => format!("\n{label}: {value}\n"),
        None => String::new(),
    }
}

pub fn team_label(team: VolunteerTeam) -> &'static str {
    match team {
        VolunteerTeam::Veterinary => "Veterinary",
        VolunteerTeam::Grooming => "Grooming",
        VolunteerTeam::Rescue => "Rescue",
        VolunteerTeam::Design => "Design and outreach",
        VolunteerTeam::Workshop => "Workshops",
        VolunteerTeam::FosterHome => "Foster homes",
    }
}

pub fn interview_scheduled(
    shelter: &ShelterConfig,
    to: &str,
    adopter_name: &str,
    animal_name: &str,
    at: NaiveDateTime,
    meeting_link: Option<&str>,
) -> EmailMessage {
    let link = meeting_link
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("we will send you the link shortly");

    EmailMessage {
        to: to.to_string(),
        subject: format!("Interview scheduled - adoption of {animal_name}"),
        body: format!(
            "Hi {adopter_name},\n\n\
             Your request to adopt {animal_name} has been reviewed and we have scheduled an interview with you.\n\n\
             Date: {}\n\
             Meeting link: {link}\n\n\
             During the interview we will talk about your home, your experience with pets and your care commitment.\n\n\
             {}",
            at.format("%d/%m/%Y at %H:%M"),
            signature(shelter)
        ),
    }
}

pub fn adoption_approved(
    shelter: &ShelterConfig,
    to: &str,
    adopter_name: &str,
    animal_name: &str,
    contract_ready: bool,
) -> EmailMessage {
    let contract = if contract_ready {
        "Your adoption contract is ready; you can review and sign it from your profile."
    } else {
        "We will let you know as soon as your adoption contract is ready to sign."
    };

    EmailMessage {
        to: to.to_string(),
        subject: format!("Adoption approved - {animal_name}"),
        body: format!(
            "Hi {adopter_name},\n\n\
             Congratulations! Your request to adopt {animal_name} has been APPROVED.\n\n\
             {contract}\n\n\
             We will stay in touch to follow up and make sure everything goes well.\n\
             Thank you for giving {animal_name} a second chance!\n\n\
             {}",
            signature(shelter)
        ),
    }
}

pub fn adoption_rejected(
    shelter: &ShelterConfig,
    to: &str,
    adopter_name: &str,
    animal_name: &str,
    reason: Option<&str>,
) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Update on your request to adopt {animal_name}"),
        body: format!(
            "Hi {adopter_name},\n\n\
             Thank you for your interest in adopting {animal_name}. Unfortunately we cannot move forward with your request.\n\
             {}\n\
             {}",
            optional_line("Reason", reason),
            signature(shelter)
        ),
    }
}

pub fn volunteer_interview(
    shelter: &ShelterConfig,
    application: &VolunteerApplication,
    at: NaiveDateTime,
) -> EmailMessage {
    let team = team_label(application.team);

    EmailMessage {
        to: application.email.clone(),
        subject: format!("Volunteer interview scheduled - {team} team"),
        body: format!(
            "Hi {},\n\n\
             Thank you for applying to the {team} team. We would like to meet you.\n\n\
             Date: {}\n\n\
             {}",
            application.full_name,
            at.format("%d/%m/%Y at %H:%M"),
            signature(shelter)
        ),
    }
}

pub fn volunteer_approved(
    shelter: &ShelterConfig,
    application: &VolunteerApplication,
    notes: Option<&str>,
) -> EmailMessage {
    let team = team_label(application.team);

    EmailMessage {
        to: application.email.clone(),
        subject: format!("Welcome to the team! - {team}"),
        body: format!(
            "Hi {},\n\n\
             Your application to volunteer with the {team} team has been APPROVED.\n\n\
             Next steps:\n\
             1. We will contact you by WhatsApp or Instagram\n\
             2. We will add you to the {team} team group\n\
             3. We will plan your first activities\n\
             {}\n\
             {}",
            application.full_name,
            optional_line("Notes", notes),
            signature(shelter)
        ),
    }
}

pub fn volunteer_rejected(
    shelter: &ShelterConfig,
    application: &VolunteerApplication,
    notes: Option<&str>,
) -> EmailMessage {
    let team = team_label(application.team);

    EmailMessage {
        to: application.email.clone(),
        subject: format!("Update on your volunteer application - {}", shelter.organization_name),
        body: format!(
            "Hi {},\n\n\
             Thank you for your interest in joining our volunteers. Right now we cannot move forward with your application for the {team} team.\n\
             {}\n\
             You are welcome to apply again when new opportunities open up.\n\n\
             {}",
            application.full_name,
            optional_line("Reason", notes),
            signature(shelter)
        ),
    }
}

pub fn password_reset(shelter: &ShelterConfig, to: &str, name: &str, link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Password recovery - {}", shelter.organization_name),
        body: format!(
            "Hi {name},\n\n\
             We received a request to reset your password. Use the link below to choose a new one:\n\n\
             {link}\n\n\
             If you did not ask for this, you can ignore this email.\n\n\
             {}",
            signature(shelter)
        ),
    }
}
