//! Closed string vocabularies stored in constrained columns.
//!
//! Values are parsed exhaustively at the storage boundary: a stored string
//! outside its vocabulary is a detected error (`SchemaError::UnknownValue`),
//! never a silently accepted value.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry::SchemaError;

macro_rules! vocab {
    ($(#[$meta:meta])* $name:ident, $label:literal, { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(SchemaError::UnknownValue {
                        vocabulary: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    };
}

vocab!(
    /// Account roles for `users.role`.
    UserRole, "user_role", {
        Admin => "admin",
        User => "user",
        Government => "government",
        System => "system",
        Auditor => "auditor",
    }
);

vocab!(
    /// Issued document kinds for `civic_documents.document_type`.
    DocumentType, "document_type", {
        Passport => "passport",
        IdCard => "id_card",
        BirthCertificate => "birth_certificate",
        MarriageCertificate => "marriage_certificate",
        DeathCertificate => "death_certificate",
        Citizenship => "citizenship",
        Visa => "visa",
        Asylum => "asylum",
        WorkPermit => "work_permit",
        StudyPermit => "study_permit",
    }
);

vocab!(
    /// Document lifecycle for `civic_documents.status`.
    DocumentStatus, "document_status", {
        Pending => "pending",
        Processing => "processing",
        Generated => "generated",
        Verified => "verified",
        Expired => "expired",
        Revoked => "revoked",
        Error => "error",
    }
);

vocab!(
    /// Applicant verification state for `civic_applicants.verification_status`.
    VerificationStatus, "verification_status", {
        Pending => "pending",
        InProgress => "in_progress",
        Verified => "verified",
        Failed => "failed",
        Blocked => "blocked",
    }
);

vocab!(
    /// Audit trail actions for `audit_logs.action`.
    AuditAction, "audit_action", {
        Create => "CREATE",
        Update => "UPDATE",
        Delete => "DELETE",
        Read => "READ",
        Login => "LOGIN",
        Logout => "LOGOUT",
        AuthAttempt => "AUTH_ATTEMPT",
        AccessDenied => "ACCESS_DENIED",
        DocumentGenerate => "DOCUMENT_GENERATE",
        DocumentVerify => "DOCUMENT_VERIFY",
        BiometricVerify => "BIOMETRIC_VERIFY",
        ProfileUpdate => "PROFILE_UPDATE",
        SettingsChange => "SETTINGS_CHANGE",
    }
);

vocab!(
    /// Severity buckets for security events and incidents.
    SecurityLevel, "security_level", {
        High => "HIGH",
        Medium => "MEDIUM",
        Low => "LOW",
    }
);

vocab!(
    /// Event classes for `compliance_events.event_type`.
    ComplianceEventType, "compliance_event_type", {
        DataAccess => "DATA_ACCESS",
        DataModification => "DATA_MODIFICATION",
        SecurityViolation => "SECURITY_VIOLATION",
        PolicyViolation => "POLICY_VIOLATION",
        AuditTrail => "AUDIT_TRAIL",
    }
);

vocab!(
    /// Session kinds for `assistant_sessions.session_type`.
    AssistantSessionType, "assistant_session_type", {
        DocumentProcessing => "document_processing",
        BiometricVerification => "biometric_verification",
        CustomerSupport => "customer_support",
        GovernmentService => "government_service",
        SystemMonitoring => "system_monitoring",
    }
);

vocab!(
    /// Command outcomes for `assistant_commands.execution_status`.
    ExecutionStatus, "execution_status", {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
        Timeout => "timeout",
    }
);

vocab!(
    /// Overall health buckets reported by observability consumers.
    SystemHealthStatus, "system_health_status", {
        Healthy => "healthy",
        Degraded => "degraded",
        Critical => "critical",
        Unknown => "unknown",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_every_variant() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        for doc in DocumentType::ALL {
            assert_eq!(doc.as_str().parse::<DocumentType>().unwrap(), *doc);
        }
        for action in AuditAction::ALL {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), *action);
        }
    }

    #[test]
    fn unknown_stored_value_is_detected() {
        let err = "superuser".parse::<UserRole>().unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownValue {
                vocabulary: "user_role",
                value: "superuser".into()
            }
        );
    }

    #[test]
    fn serde_uses_the_wire_strings() {
        let json = serde_json::to_string(&DocumentType::BirthCertificate).unwrap();
        assert_eq!(json, "\"birth_certificate\"");
        let back: DocumentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DocumentType::BirthCertificate);
        assert!(serde_json::from_str::<DocumentType>("\"drivers_license\"").is_err());
    }
}
