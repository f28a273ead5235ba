// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static interface descriptions.

use std::fmt::Write;

/// Name of the version property every interface carries.
pub const VERSION_PROPERTY: &str = "Version";

static VERSION_DESCRIPTOR: PropertyDescriptor = PropertyDescriptor::constant(VERSION_PROPERTY, "q");

/// Whether a property can be written over the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read-only.
    Read,
    /// Readable and writable.
    ReadWrite,
}

/// Description of a property.
#[derive(Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: &'static str,
    /// Type signature (a single complete type).
    pub signature: &'static str,
    /// Bus access.
    pub access: Access,
    /// Whether changes are announced with `PropertiesChanged`.
    pub emits_changed: bool,
}

impl PropertyDescriptor {
    /// A read-only property that announces changes.
    #[must_use]
    pub const fn read(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature,
            access: Access::Read,
            emits_changed: true,
        }
    }

    /// A writable property that announces changes.
    #[must_use]
    pub const fn read_write(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature,
            access: Access::ReadWrite,
            emits_changed: true,
        }
    }

    /// A read-only property that never changes at runtime.
    #[must_use]
    pub const fn constant(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature,
            access: Access::Read,
            emits_changed: false,
        }
    }

    /// Returns `true` if the property can be written over the bus.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }
}

/// A named method or signal argument.
#[derive(Debug, PartialEq, Eq)]
pub struct Arg {
    /// Argument name.
    pub name: &'static str,
    /// Type signature (a single complete type).
    pub signature: &'static str,
}

impl Arg {
    /// Creates an argument description.
    #[must_use]
    pub const fn new(name: &'static str, signature: &'static str) -> Self {
        Self { name, signature }
    }
}

/// Description of a method.
#[derive(Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: &'static str,
    /// Input arguments.
    pub inputs: &'static [Arg],
    /// Output arguments.
    pub outputs: &'static [Arg],
}

impl MethodDescriptor {
    /// Returns the concatenated input signature.
    #[must_use]
    pub fn input_signature(&self) -> String {
        self.inputs.iter().map(|a| a.signature).collect()
    }

    /// Returns the concatenated output signature.
    #[must_use]
    pub fn output_signature(&self) -> String {
        self.outputs.iter().map(|a| a.signature).collect()
    }
}

/// Description of a signal.
#[derive(Debug, PartialEq, Eq)]
pub struct SignalDescriptor {
    /// Signal name.
    pub name: &'static str,
    /// Signal arguments.
    pub args: &'static [Arg],
    /// Whether the signal is sent sessionless.
    pub sessionless: bool,
}

impl SignalDescriptor {
    /// Returns the concatenated argument signature.
    #[must_use]
    pub fn signature(&self) -> String {
        self.args.iter().map(|a| a.signature).collect()
    }
}

/// Description of an interface: its bus name, version and members.
///
/// The `Version` property is implicit and not listed in `properties`;
/// [`InterfaceDescriptor::property`] still finds it.
#[derive(Debug, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    /// Bus interface name.
    pub name: &'static str,
    /// Interface version reported by the `Version` property.
    pub version: u16,
    /// Properties, without `Version`.
    pub properties: &'static [PropertyDescriptor],
    /// Methods.
    pub methods: &'static [MethodDescriptor],
    /// Signals.
    pub signals: &'static [SignalDescriptor],
}

impl InterfaceDescriptor {
    /// Looks up a property by name, including `Version`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        if name == VERSION_PROPERTY {
            return Some(&VERSION_DESCRIPTOR);
        }
        self.properties.iter().find(|p| p.name == name)
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Looks up a signal by name.
    #[must_use]
    pub fn signal(&self, name: &str) -> Option<&SignalDescriptor> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Iterates over the properties that announce changes.
    pub fn emitting_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.emits_changed)
    }

    /// Renders the `<interface>` element of an introspection document.
    #[must_use]
    pub fn introspection_xml(&self) -> String {
        let mut xml = String::new();
        let _ = writeln!(xml, "  <interface name=\"{}\">", self.name);
        for property in std::iter::once(&VERSION_DESCRIPTOR).chain(self.properties) {
            let access = match property.access {
                Access::Read => "read",
                Access::ReadWrite => "readwrite",
            };
            let emits = if property.emits_changed {
                "true"
            } else {
                "const"
            };
            let _ = writeln!(
                xml,
                "    <property name=\"{}\" type=\"{}\" access=\"{access}\">",
                property.name, property.signature
            );
            let _ = writeln!(
                xml,
                "      <annotation name=\"org.freedesktop.DBus.Property.EmitsChangedSignal\" value=\"{emits}\"/>"
            );
            xml.push_str("    </property>\n");
        }
        for method in self.methods {
            let _ = writeln!(xml, "    <method name=\"{}\">", method.name);
            for arg in method.inputs {
                let _ = writeln!(
                    xml,
                    "      <arg name=\"{}\" type=\"{}\" direction=\"in\"/>",
                    arg.name, arg.signature
                );
            }
            for arg in method.outputs {
                let _ = writeln!(
                    xml,
                    "      <arg name=\"{}\" type=\"{}\" direction=\"out\"/>",
                    arg.name, arg.signature
                );
            }
            xml.push_str("    </method>\n");
        }
        for signal in self.signals {
            let _ = writeln!(xml, "    <signal name=\"{}\">", signal.name);
            for arg in signal.args {
                let _ = writeln!(
                    xml,
                    "      <arg name=\"{}\" type=\"{}\"/>",
                    arg.name, arg.signature
                );
            }
            xml.push_str("    </signal>\n");
        }
        xml.push_str("  </interface>\n");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE: InterfaceDescriptor = InterfaceDescriptor {
        name: "org.example.Sample",
        version: 2,
        properties: &[
            PropertyDescriptor::read_write("Level", "y"),
            PropertyDescriptor::constant("MaxLevel", "y"),
        ],
        methods: &[MethodDescriptor {
            name: "Reset",
            inputs: &[Arg::new("reason", "s")],
            outputs: &[Arg::new("previous", "y")],
        }],
        signals: &[SignalDescriptor {
            name: "Done",
            args: &[],
            sessionless: true,
        }],
    };

    #[test]
    fn version_is_implicit() {
        let version = SAMPLE.property("Version").unwrap();
        assert_eq!(version.signature, "q");
        assert!(!version.is_writable());
    }

    #[test]
    fn member_lookup() {
        assert!(SAMPLE.property("Level").unwrap().is_writable());
        assert_eq!(SAMPLE.method("Reset").unwrap().input_signature(), "s");
        assert_eq!(SAMPLE.method("Reset").unwrap().output_signature(), "y");
        assert!(SAMPLE.signal("Done").unwrap().sessionless);
        assert!(SAMPLE.method("Done").is_none());
    }

    #[test]
    fn emitting_properties_skip_constants() {
        let names: Vec<_> = SAMPLE.emitting_properties().map(|p| p.name).collect();
        assert_eq!(names, vec!["Level"]);
    }

    #[test]
    fn introspection_lists_members() {
        let xml = SAMPLE.introspection_xml();
        assert!(xml.contains("<interface name=\"org.example.Sample\">"));
        assert!(xml.contains("<property name=\"Version\" type=\"q\" access=\"read\">"));
        assert!(xml.contains("<property name=\"Level\" type=\"y\" access=\"readwrite\">"));
        assert!(xml.contains("<arg name=\"reason\" type=\"s\" direction=\"in\"/>"));
        assert!(xml.contains("<signal name=\"Done\">"));
    }
}
