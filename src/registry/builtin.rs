use super::NodeRegistry;
use super::definition::{NodeDefinition, NodeKind, PortDefinition};
use super::types::{COMPONENT_TYPE, EVENT_RECEIVER_TYPE, OBJECT_TYPE, VARIABLE_TYPE};

/// Type names for which a `Variable_<type>` node is registered by default.
pub const DEFAULT_VARIABLE_TYPES: &[&str] = &[
    "bool",
    "int",
    "float",
    "string",
    "Vector2",
    "Vector3",
    "Quaternion",
    "Color",
    "GameObject",
    "Transform",
    COMPONENT_TYPE,
    EVENT_RECEIVER_TYPE,
];

/// Declares the built-in node catalog and its registration function.
///
/// Each row reads `name => Kind { values, inputs, outputs, flow_in, flow_outputs }`
/// where ports are `(port_name, type_name)` pairs.
macro_rules! define_builtin_nodes {
    ( $(
        $name:literal => $kind:ident {
            values: [ $( ($v_name:literal, $v_ty:expr) ),* ],
            inputs: [ $( ($in_name:literal, $in_ty:expr) ),* ],
            outputs: [ $( ($out_name:literal, $out_ty:expr) ),* ],
            flow_in: $flow_in:expr,
            flow_outputs: [ $( $flow:literal ),* ] $(,)?
        }
    ),* $(,)? ) => {
        pub(super) fn register_builtin_nodes(registry: &mut NodeRegistry) {
            $(
                registry.register(NodeDefinition {
                    full_name: $name.to_string(),
                    kind: NodeKind::$kind,
                    values: vec![ $( PortDefinition::new($v_name, $v_ty) ),* ],
                    inputs: vec![ $( PortDefinition::new($in_name, $in_ty) ),* ],
                    outputs: vec![ $( PortDefinition::new($out_name, $out_ty) ),* ],
                    flow_input: $flow_in,
                    flow_outputs: vec![ $( $flow.to_string() ),* ],
                });
            )*
        }
    };
}

define_builtin_nodes! {
    // Events
    "Event_Start" => Event {
        values: [], inputs: [], outputs: [], flow_in: false, flow_outputs: ["next"]
    },
    "Event_Update" => Event {
        values: [], inputs: [], outputs: [], flow_in: false, flow_outputs: ["next"]
    },
    "Event_Interact" => Event {
        values: [], inputs: [], outputs: [], flow_in: false, flow_outputs: ["next"]
    },
    "Event_Custom" => Event {
        values: [("eventName", "string")], inputs: [], outputs: [],
        flow_in: false, flow_outputs: ["next"]
    },

    // Variable access
    "Get_Variable" => Getter {
        values: [("variable", "string")], inputs: [], outputs: [("value", VARIABLE_TYPE)],
        flow_in: false, flow_outputs: []
    },
    "Set_Variable" => Setter {
        values: [("variable", "string"), ("sendChange", "bool")],
        inputs: [("value", VARIABLE_TYPE)], outputs: [],
        flow_in: true, flow_outputs: ["next"]
    },
    "Event_OnVariableChange" => ChangeEvent {
        values: [("variable", "string")], inputs: [],
        outputs: [("oldValue", VARIABLE_TYPE), ("newValue", VARIABLE_TYPE)],
        flow_in: false, flow_outputs: ["next"]
    },

    // Constants
    "Const_Bool" => Constant {
        values: [("value", "bool")], inputs: [], outputs: [("value", "bool")],
        flow_in: false, flow_outputs: []
    },
    "Const_Int" => Constant {
        values: [("value", "int")], inputs: [], outputs: [("value", "int")],
        flow_in: false, flow_outputs: []
    },
    "Const_Float" => Constant {
        values: [("value", "float")], inputs: [], outputs: [("value", "float")],
        flow_in: false, flow_outputs: []
    },
    "Const_String" => Constant {
        values: [("value", "string")], inputs: [], outputs: [("value", "string")],
        flow_in: false, flow_outputs: []
    },
    "Const_Vector3" => Constant {
        values: [("value", "Vector3")], inputs: [], outputs: [("value", "Vector3")],
        flow_in: false, flow_outputs: []
    },

    // Control flow
    "Block" => Control {
        values: [], inputs: [], outputs: [], flow_in: true, flow_outputs: ["0", "1"]
    },
    "Branch" => Control {
        values: [], inputs: [("condition", "bool")], outputs: [],
        flow_in: true, flow_outputs: ["True", "False"]
    },
    "For" => Control {
        values: [], inputs: [("start", "int"), ("end", "int"), ("step", "int")],
        outputs: [("index", "int")], flow_in: true, flow_outputs: ["body", "exit"]
    },
    "While" => Control {
        values: [], inputs: [("condition", "bool")], outputs: [],
        flow_in: true, flow_outputs: ["body", "exit"]
    },

    // Operators and methods
    "Int_Add" => Ordinary {
        values: [], inputs: [("a", "int"), ("b", "int")], outputs: [("result", "int")],
        flow_in: false, flow_outputs: []
    },
    "Int_GreaterThan" => Ordinary {
        values: [], inputs: [("a", "int"), ("b", "int")], outputs: [("result", "bool")],
        flow_in: false, flow_outputs: []
    },
    "Float_Multiply" => Ordinary {
        values: [], inputs: [("a", "float"), ("b", "float")], outputs: [("result", "float")],
        flow_in: false, flow_outputs: []
    },
    "Vector3_Add" => Ordinary {
        values: [], inputs: [("a", "Vector3"), ("b", "Vector3")], outputs: [("result", "Vector3")],
        flow_in: false, flow_outputs: []
    },
    "String_Concat" => Ordinary {
        values: [], inputs: [("a", "string"), ("b", "string")], outputs: [("result", "string")],
        flow_in: false, flow_outputs: []
    },
    "Object_ToString" => Ordinary {
        values: [], inputs: [("instance", OBJECT_TYPE)], outputs: [("result", "string")],
        flow_in: false, flow_outputs: []
    },
    "GameObject_GetComponent" => Ordinary {
        values: [], inputs: [("instance", "GameObject"), ("type", "string")],
        outputs: [("component", COMPONENT_TYPE)], flow_in: false, flow_outputs: []
    },
    "Component_GetTransform" => Ordinary {
        values: [], inputs: [("instance", COMPONENT_TYPE)], outputs: [("transform", "Transform")],
        flow_in: false, flow_outputs: []
    },
    "Transform_GetPosition" => Ordinary {
        values: [], inputs: [("instance", "Transform")], outputs: [("position", "Vector3")],
        flow_in: false, flow_outputs: []
    },
    "Transform_SetPosition" => Ordinary {
        values: [], inputs: [("instance", "Transform"), ("position", "Vector3")], outputs: [],
        flow_in: true, flow_outputs: ["next"]
    },
    "UdonBehaviour_SendCustomEvent" => Ordinary {
        values: [], inputs: [("instance", EVENT_RECEIVER_TYPE), ("eventName", "string")],
        outputs: [], flow_in: true, flow_outputs: ["next"]
    },
    "Debug_Log" => Ordinary {
        values: [], inputs: [("message", OBJECT_TYPE)], outputs: [],
        flow_in: true, flow_outputs: ["next"]
    },

    // Visual only
    "Comment" => Comment {
        values: [("text", "string")], inputs: [], outputs: [], flow_in: false, flow_outputs: []
    },
}

/// Direct supertypes of the built-in types.
pub(super) const BUILTIN_TYPES: &[(&str, &[&str])] = &[
    ("bool", &[]),
    ("int", &[]),
    ("float", &[]),
    ("string", &[]),
    ("Vector2", &[]),
    ("Vector3", &[]),
    ("Quaternion", &[]),
    ("Color", &[]),
    ("GameObject", &[]),
    (COMPONENT_TYPE, &[]),
    ("Transform", &[COMPONENT_TYPE]),
    ("Behaviour", &[COMPONENT_TYPE]),
    (EVENT_RECEIVER_TYPE, &[]),
];
