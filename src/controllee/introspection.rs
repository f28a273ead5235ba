// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::about::ABOUT_PATH;
use crate::error::{Error, Result};
use crate::types::ObjectPath;

use super::Controllee;

const DOCTYPE: &str = "<!DOCTYPE node PUBLIC \"-//freedesktop//DTD D-BUS Object Introspection 1.0//EN\"\n \"http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd\">\n";

const INTROSPECTABLE_XML: &str = r#"  <interface name="org.freedesktop.DBus.Introspectable">
    <method name="Introspect">
      <arg name="data" type="s" direction="out"/>
    </method>
  </interface>
"#;

const PROPERTIES_XML: &str = r#"  <interface name="org.freedesktop.DBus.Properties">
    <method name="Get">
      <arg name="interface" type="s" direction="in"/>
      <arg name="propname" type="s" direction="in"/>
      <arg name="value" type="v" direction="out"/>
    </method>
    <method name="GetAll">
      <arg name="interface" type="s" direction="in"/>
      <arg name="props" type="a{sv}" direction="out"/>
    </method>
    <method name="Set">
      <arg name="interface" type="s" direction="in"/>
      <arg name="propname" type="s" direction="in"/>
      <arg name="value" type="v" direction="in"/>
    </method>
    <signal name="PropertiesChanged">
      <arg name="interface" type="s"/>
      <arg name="changed_props" type="a{sv}"/>
      <arg name="invalidated_props" type="as"/>
    </signal>
  </interface>
"#;

const ABOUT_XML: &str = r#"  <interface name="org.alljoyn.About">
    <property name="Version" type="q" access="read"/>
    <method name="GetAboutData">
      <arg name="languageTag" type="s" direction="in"/>
      <arg name="aboutData" type="a{sv}" direction="out"/>
    </method>
    <method name="GetObjectDescription">
      <arg name="objectDescription" type="a(oas)" direction="out"/>
    </method>
    <signal name="Announce">
      <arg name="version" type="q"/>
      <arg name="port" type="q"/>
      <arg name="objectDescription" type="a(oas)"/>
      <arg name="metaData" type="a{sv}"/>
    </signal>
  </interface>
"#;

impl Controllee {
    /// Returns the introspection document of `path`.
    ///
    /// Lists the interfaces registered at `path` and its direct children.
    /// Every node implements `Introspectable`; objects with interfaces also
    /// list `Properties`. `/About` carries the About interface. Intermediate
    /// paths such as `/Cdm` exist as long as an object lives below them.
    ///
    /// # Errors
    ///
    /// Returns `Error::ObjectNotFound` if nothing is registered at or below
    /// `path`.
    pub fn introspect(&self, path: &ObjectPath) -> Result<String> {
        let interfaces = self.interfaces(path);
        let is_about = path.as_str() == ABOUT_PATH;
        let mut paths = self.object_paths();
        paths.push(ObjectPath::new(ABOUT_PATH)?);
        let children = child_nodes(&paths, path);
        if interfaces.is_empty() && children.is_empty() && !is_about {
            return Err(Error::ObjectNotFound(path.to_string()));
        }

        let mut xml = String::from(DOCTYPE);
        let _ = writeln!(xml, "<node name=\"{path}\">");
        xml.push_str(INTROSPECTABLE_XML);
        if is_about || !interfaces.is_empty() {
            xml.push_str(PROPERTIES_XML);
        }
        if is_about {
            xml.push_str(ABOUT_XML);
        }
        for ty in interfaces {
            xml.push_str(&ty.descriptor().introspection_xml());
        }
        for child in children {
            let _ = writeln!(xml, "  <node name=\"{child}\"/>");
        }
        xml.push_str("</node>\n");
        Ok(xml)
    }
}

/// Names of the direct children of `parent` among `paths`.
fn child_nodes<'a>(paths: &'a [ObjectPath], parent: &ObjectPath) -> BTreeSet<&'a str> {
    let prefix = if parent.as_str() == "/" {
        "/".to_string()
    } else {
        format!("{parent}/")
    };
    paths
        .iter()
        .filter_map(|path| path.as_str().strip_prefix(prefix.as_str()))
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.split_once('/').map_or(rest, |(head, _)| head))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::about::AboutData;
    use crate::bus::LoopbackBus;
    use crate::interface::operation::{ClosedStatus, OnOffStatus};

    fn path(p: &str) -> ObjectPath {
        ObjectPath::new(p).unwrap()
    }

    #[test]
    fn children_are_direct_segments() {
        let paths = vec![
            path("/Cdm/Fridge"),
            path("/Cdm/Fridge/Freezer"),
            path("/Cdm/Oven"),
            path("/Other"),
        ];
        let root: Vec<_> = child_nodes(&paths, &ObjectPath::root()).into_iter().collect();
        assert_eq!(root, vec!["Cdm", "Other"]);

        let cdm: Vec<_> = child_nodes(&paths, &path("/Cdm")).into_iter().collect();
        assert_eq!(cdm, vec!["Fridge", "Oven"]);

        assert!(child_nodes(&paths, &path("/Cdm/Oven")).is_empty());
    }

    #[test]
    fn about_object_is_introspectable() {
        let controllee = Controllee::new(Arc::new(LoopbackBus::new(":1.2")), AboutData::new("en"));
        let xml = controllee.introspect(&path(ABOUT_PATH)).unwrap();
        assert!(xml.contains("<node name=\"/About\">"));
        assert!(xml.contains("<interface name=\"org.alljoyn.About\">"));
        assert!(xml.contains("<method name=\"GetAboutData\">"));
        assert!(xml.contains("org.freedesktop.DBus.Properties"));
        assert!(xml.contains("org.freedesktop.DBus.Introspectable"));
    }

    #[test]
    fn document_lists_interfaces_and_children() {
        let controllee = Controllee::new(Arc::new(LoopbackBus::new(":1.2")), AboutData::new("en"));
        let fridge = path("/Cdm/Fridge");
        controllee
            .add_interface(&fridge, ClosedStatus::new(true))
            .unwrap();
        controllee
            .add_interface(&path("/Cdm/Fridge/Light"), OnOffStatus::new(false))
            .unwrap();

        let xml = controllee.introspect(&fridge).unwrap();
        assert!(xml.starts_with("<!DOCTYPE node"));
        assert!(xml.contains("<node name=\"/Cdm/Fridge\">"));
        assert!(xml.contains("org.alljoyn.SmartSpaces.Operation.ClosedStatus"));
        assert!(xml.contains("<node name=\"Light\"/>"));
        assert!(!xml.contains("OnOffStatus"));
        assert!(xml.contains("org.freedesktop.DBus.Properties"));
        assert!(xml.contains("org.freedesktop.DBus.Introspectable"));

        let parent = controllee.introspect(&path("/Cdm")).unwrap();
        assert!(parent.contains("<node name=\"Fridge\"/>"));
        assert!(parent.contains("org.freedesktop.DBus.Introspectable"));
        assert!(!parent.contains("org.freedesktop.DBus.Properties"));

        let root = controllee.introspect(&ObjectPath::root()).unwrap();
        assert!(root.contains("<node name=\"About\"/>"));
        assert!(root.contains("<node name=\"Cdm\"/>"));

        assert!(matches!(
            controllee.introspect(&path("/Nowhere")),
            Err(Error::ObjectNotFound(_))
        ));
    }
}
