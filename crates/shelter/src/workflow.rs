//! Status machines for adoption requests, adoptions and volunteer
//! applications.
//!
//! Every status change in the shelter goes through [`Workflow::apply`], so a
//! transition missing from the tables below can never be persisted.

use std::fmt;

use rescatando_database::{AdoptionStatus, ApplicationStatus, RequestStatus};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} {kind} with status '{from}'")]
pub struct TransitionError {
    pub kind: &'static str,
    pub from: String,
    pub action: String,
}

/// A closed status type with a transition table.
pub trait Workflow: Copy + fmt::Display + Sized {
    type Action: Copy + fmt::Display;

    const KIND: &'static str;

    /// Resolve the target status for `action`, or `None` when the table has
    /// no such edge.
    fn next(self, action: Self::Action) -> Option<Self>;

    fn apply(self, action: Self::Action) -> Result<Self, TransitionError> {
        self.next(action).ok_or_else(|| TransitionError {
            kind: Self::KIND,
            from: self.to_string(),
            action: action.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    ScheduleInterview,
    MarkInterviewDone,
    Approve,
    Reject,
    /// Used when the adoption created from an approved request is deleted.
    CancelAdoption,
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestAction::ScheduleInterview => "schedule an interview for",
            RequestAction::MarkInterviewDone => "finish the interview of",
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
            RequestAction::CancelAdoption => "cancel the adoption of",
        })
    }
}

impl Workflow for RequestStatus {
    type Action = RequestAction;

    const KIND: &'static str = "adoption request";

    fn next(self, action: RequestAction) -> Option<Self> {
        use RequestAction as A;
        use RequestStatus as S;

        match (self, action) {
            (S::Pending, A::ScheduleInterview) => Some(S::InterviewScheduled),
            (S::InterviewScheduled, A::MarkInterviewDone) => Some(S::InterviewDone),
            (S::Pending | S::InterviewScheduled | S::InterviewDone, A::Approve) => Some(S::Approved),
            (S::Pending | S::InterviewScheduled | S::InterviewDone, A::Reject) => Some(S::Rejected),
            (S::Approved, A::CancelAdoption) => Some(S::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdoptionAction {
    GenerateContract,
    Complete,
}

impl fmt::Display for AdoptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdoptionAction::GenerateContract => "generate the contract of",
            AdoptionAction::Complete => "complete",
        })
    }
}

impl Workflow for AdoptionStatus {
    type Action = AdoptionAction;

    const KIND: &'static str = "adoption";

    fn next(self, action: AdoptionAction) -> Option<Self> {
        match (self, action) {
            (AdoptionStatus::InProgress, AdoptionAction::GenerateContract) => {
                Some(AdoptionStatus::ContractGenerated)
            }
            (AdoptionStatus::ContractGenerated, AdoptionAction::Complete) => {
                Some(AdoptionStatus::Completed)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationAction {
    ScheduleInterview,
    Approve,
    Reject,
}

impl fmt::Display for ApplicationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApplicationAction::ScheduleInterview => "schedule an interview for",
            ApplicationAction::Approve => "approve",
            ApplicationAction::Reject => "reject",
        })
    }
}

impl Workflow for ApplicationStatus {
    type Action = ApplicationAction;

    const KIND: &'static str = "volunteer application";

    fn next(self, action: ApplicationAction) -> Option<Self> {
        use ApplicationAction as A;
        use ApplicationStatus as S;

        match (self, action) {
            (S::Pending, A::ScheduleInterview) => Some(S::InterviewScheduled),
            (S::Pending | S::InterviewScheduled, A::Approve) => Some(S::Approved),
            (S::Pending | S::InterviewScheduled, A::Reject) => Some(S::Rejected),
            _ => None,
        }
    }
}
