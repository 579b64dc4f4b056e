//! BPMN element categories and display naming.
//!
//! Element types arrive from the document as qualified strings like
//! `bpmn:UserTask`. Instead of scattering string comparisons through the
//! classifier and reconciler, the known categories are modeled as a closed
//! enum with one explicit mapping to display labels.

/// A closed set of known BPMN element categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    // Events
    StartEvent,
    EndEvent,
    IntermediateThrowEvent,
    IntermediateCatchEvent,
    BoundaryEvent,

    // Activities
    Task,
    UserTask,
    ServiceTask,
    ScriptTask,
    ManualTask,
    SendTask,
    ReceiveTask,
    BusinessRuleTask,
    CallActivity,
    SubProcess,

    // Gateways
    ExclusiveGateway,
    ParallelGateway,
    InclusiveGateway,
    EventBasedGateway,
    ComplexGateway,

    // Connections
    SequenceFlow,
    MessageFlow,
    Association,

    // Containers
    Process,
    Collaboration,
    Participant,
    Lane,
    LaneSet,

    // Root element definitions
    Message,
    Signal,
    Error,
    Escalation,

    // Artifacts and data
    DataObject,
    DataObjectReference,
    DataStoreReference,
    TextAnnotation,
    Group,

    /// Any element type outside the known set; carries the raw local name.
    Other(String),
}

impl ElementKind {
    /// Parses a kind from a qualified type string such as `bpmn:UserTask`.
    ///
    /// The namespace prefix is ignored; matching is on the local name with
    /// the casing used by BPMN model types (`UserTask`) and by the XML tag
    /// names (`userTask`) both accepted.
    pub fn from_type(element_type: &str) -> ElementKind {
        let local = element_type
            .rsplit(':')
            .next()
            .unwrap_or(element_type)
            .to_ascii_lowercase();

        match local.as_str() {
            "startevent" => ElementKind::StartEvent,
            "endevent" => ElementKind::EndEvent,
            "intermediatethrowevent" => ElementKind::IntermediateThrowEvent,
            "intermediatecatchevent" => ElementKind::IntermediateCatchEvent,
            "boundaryevent" => ElementKind::BoundaryEvent,
            "task" => ElementKind::Task,
            "usertask" => ElementKind::UserTask,
            "servicetask" => ElementKind::ServiceTask,
            "scripttask" => ElementKind::ScriptTask,
            "manualtask" => ElementKind::ManualTask,
            "sendtask" => ElementKind::SendTask,
            "receivetask" => ElementKind::ReceiveTask,
            "businessruletask" => ElementKind::BusinessRuleTask,
            "callactivity" => ElementKind::CallActivity,
            "subprocess" => ElementKind::SubProcess,
            "exclusivegateway" => ElementKind::ExclusiveGateway,
            "parallelgateway" => ElementKind::ParallelGateway,
            "inclusivegateway" => ElementKind::InclusiveGateway,
            "eventbasedgateway" => ElementKind::EventBasedGateway,
            "complexgateway" => ElementKind::ComplexGateway,
            "sequenceflow" => ElementKind::SequenceFlow,
            "messageflow" => ElementKind::MessageFlow,
            "association" => ElementKind::Association,
            "process" => ElementKind::Process,
            "collaboration" => ElementKind::Collaboration,
            "participant" => ElementKind::Participant,
            "lane" => ElementKind::Lane,
            "laneset" => ElementKind::LaneSet,
            "message" => ElementKind::Message,
            "signal" => ElementKind::Signal,
            "error" => ElementKind::Error,
            "escalation" => ElementKind::Escalation,
            "dataobject" => ElementKind::DataObject,
            "dataobjectreference" => ElementKind::DataObjectReference,
            "datastorereference" => ElementKind::DataStoreReference,
            "textannotation" => ElementKind::TextAnnotation,
            "group" => ElementKind::Group,
            _ => {
                let raw = element_type
                    .rsplit(':')
                    .next()
                    .unwrap_or(element_type)
                    .to_string();
                ElementKind::Other(raw)
            }
        }
    }

    /// Returns the human-readable label for this kind.
    pub fn label(&self) -> String {
        match self {
            ElementKind::StartEvent => "Start Event".to_string(),
            ElementKind::EndEvent => "End Event".to_string(),
            ElementKind::IntermediateThrowEvent => "Intermediate Throw Event".to_string(),
            ElementKind::IntermediateCatchEvent => "Intermediate Catch Event".to_string(),
            ElementKind::BoundaryEvent => "Boundary Event".to_string(),
            ElementKind::Task => "Task".to_string(),
            ElementKind::UserTask => "User Task".to_string(),
            ElementKind::ServiceTask => "Service Task".to_string(),
            ElementKind::ScriptTask => "Script Task".to_string(),
            ElementKind::ManualTask => "Manual Task".to_string(),
            ElementKind::SendTask => "Send Task".to_string(),
            ElementKind::ReceiveTask => "Receive Task".to_string(),
            ElementKind::BusinessRuleTask => "Business Rule Task".to_string(),
            ElementKind::CallActivity => "Call Activity".to_string(),
            ElementKind::SubProcess => "Sub Process".to_string(),
            ElementKind::ExclusiveGateway => "Exclusive Gateway".to_string(),
            ElementKind::ParallelGateway => "Parallel Gateway".to_string(),
            ElementKind::InclusiveGateway => "Inclusive Gateway".to_string(),
            ElementKind::EventBasedGateway => "Event Based Gateway".to_string(),
            ElementKind::ComplexGateway => "Complex Gateway".to_string(),
            ElementKind::SequenceFlow => "Sequence Flow".to_string(),
            ElementKind::MessageFlow => "Message Flow".to_string(),
            ElementKind::Association => "Association".to_string(),
            ElementKind::Process => "Process".to_string(),
            ElementKind::Collaboration => "Collaboration".to_string(),
            ElementKind::Participant => "Participant".to_string(),
            ElementKind::Lane => "Lane".to_string(),
            ElementKind::LaneSet => "Lane Set".to_string(),
            ElementKind::Message => "Message".to_string(),
            ElementKind::Signal => "Signal".to_string(),
            ElementKind::Error => "Error".to_string(),
            ElementKind::Escalation => "Escalation".to_string(),
            ElementKind::DataObject => "Data Object".to_string(),
            ElementKind::DataObjectReference => "Data Object Reference".to_string(),
            ElementKind::DataStoreReference => "Data Store Reference".to_string(),
            ElementKind::TextAnnotation => "Text Annotation".to_string(),
            ElementKind::Group => "Group".to_string(),
            ElementKind::Other(raw) => raw.clone(),
        }
    }

    /// Returns true for pool-level elements whose change records nest their
    /// descriptive info under a `model` reference instead of carrying a
    /// direct type.
    pub fn is_pool_level(&self) -> bool {
        matches!(
            self,
            ElementKind::Participant | ElementKind::Lane | ElementKind::Collaboration
        )
    }
}

/// Injected, side-effect-free lookup from raw names and types to display
/// strings.
///
/// The classifier takes this as a collaborator so it can be tested with a
/// fake table; `DefaultNaming` is the production mapping.
pub trait ElementNaming {
    /// Maps a raw type string (`bpmn:UserTask`) to a display label.
    fn type_label(&self, element_type: &str) -> String;

    /// Maps a raw element name to a display name. Defaults to the name
    /// itself.
    fn name_label(&self, name: &str) -> String {
        name.to_string()
    }
}

/// The standard naming table, backed by [`ElementKind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNaming;

impl ElementNaming for DefaultNaming {
    fn type_label(&self, element_type: &str) -> String {
        if element_type.is_empty() {
            return String::new();
        }
        ElementKind::from_type(element_type).label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_model_type() {
        assert_eq!(ElementKind::from_type("bpmn:UserTask"), ElementKind::UserTask);
        assert_eq!(
            ElementKind::from_type("bpmn:ExclusiveGateway"),
            ElementKind::ExclusiveGateway
        );
    }

    #[test]
    fn test_kind_from_tag_name() {
        // XML tag names use lowerCamelCase.
        assert_eq!(ElementKind::from_type("bpmn:userTask"), ElementKind::UserTask);
        assert_eq!(ElementKind::from_type("sequenceFlow"), ElementKind::SequenceFlow);
    }

    #[test]
    fn test_unknown_kind_keeps_raw_name() {
        let kind = ElementKind::from_type("camunda:connector");
        assert_eq!(kind, ElementKind::Other("connector".to_string()));
        assert_eq!(kind.label(), "connector");
    }

    #[test]
    fn test_default_naming_labels() {
        let naming = DefaultNaming;
        assert_eq!(naming.type_label("bpmn:UserTask"), "User Task");
        assert_eq!(naming.type_label("bpmn:startEvent"), "Start Event");
        assert_eq!(naming.type_label(""), "");
        assert_eq!(naming.name_label("Check invoice"), "Check invoice");
    }

    #[test]
    fn test_pool_level_kinds() {
        assert!(ElementKind::Participant.is_pool_level());
        assert!(ElementKind::Lane.is_pool_level());
        assert!(ElementKind::Collaboration.is_pool_level());
        assert!(!ElementKind::UserTask.is_pool_level());
        assert!(!ElementKind::Process.is_pool_level());
    }
}
