// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The controllee: registry and dispatch of interface handlers.

mod dispatch;
mod introspection;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::about::{ABOUT_PATH, ABOUT_VERSION, AboutData, ObjectDescription};
use crate::bus::BusAttachment;
use crate::config::{ControlleeConfig, DEFAULT_SESSION_PORT};
use crate::error::{ConfigError, Error, MarshalError, Result};
use crate::interface::{Interface, InterfaceHandler, InterfaceType, PendingSignal};
use crate::marshal::Marshal;
use crate::message::{ABOUT_INTERFACE, Signal};
use crate::types::{ObjectPath, Value};

/// A registered handler, locked while a call runs.
type SharedHandler = Arc<Mutex<Box<dyn InterfaceHandler>>>;

/// Cached values of the emitting properties, taken before a mutation.
type Snapshot = Vec<(&'static str, Option<Value>)>;

/// Device side of the Common Device Model.
///
/// The `Controllee` owns one handler per (object path, interface) pair and
/// routes incoming method calls to them. Whenever a call or an application
/// update changes cached state, it sends `PropertiesChanged` for the
/// properties that changed, followed by any interface signals the handler
/// queued.
///
/// Listeners run while their interface is locked and must not call back
/// into the same interface through the controllee.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use cdm_controllee::Controllee;
/// use cdm_controllee::about::AboutData;
/// use cdm_controllee::bus::LoopbackBus;
/// use cdm_controllee::interface::operation::OnOffStatus;
/// use cdm_controllee::types::ObjectPath;
///
/// let bus = Arc::new(LoopbackBus::new(":1.7"));
/// let mut signals = bus.subscribe();
/// let controllee = Controllee::new(bus, AboutData::new("en"));
///
/// let path = ObjectPath::new("/Cdm/Lamp").unwrap();
/// controllee
///     .add_interface(&path, OnOffStatus::new(false))
///     .unwrap();
///
/// controllee
///     .update::<OnOffStatus, _>(&path, |lamp| lamp.set_is_on(true))
///     .unwrap();
///
/// let signal = signals.try_recv().unwrap();
/// assert_eq!(signal.member, "PropertiesChanged");
/// ```
pub struct Controllee {
    /// Bus used to send signals.
    bus: Arc<dyn BusAttachment>,
    /// Published metadata.
    about: RwLock<AboutData>,
    /// Port announced to controllers.
    session_port: u16,
    /// Registered handlers, keyed by object path and interface.
    objects: RwLock<BTreeMap<(ObjectPath, InterfaceType), SharedHandler>>,
}

impl Controllee {
    /// Creates a controllee with the default session port.
    #[must_use]
    pub fn new(bus: Arc<dyn BusAttachment>, about: AboutData) -> Self {
        Self {
            bus,
            about: RwLock::new(about),
            session_port: DEFAULT_SESSION_PORT,
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a controllee from a loaded configuration.
    #[must_use]
    pub fn from_config(bus: Arc<dyn BusAttachment>, config: ControlleeConfig) -> Self {
        Self::new(bus, config.about).with_session_port(config.session_port)
    }

    /// Sets the session port announced to controllers.
    #[must_use]
    pub fn with_session_port(mut self, port: u16) -> Self {
        self.session_port = port;
        self
    }

    /// Returns the session port.
    #[must_use]
    pub fn session_port(&self) -> u16 {
        self.session_port
    }

    /// Returns the bus attachment.
    #[must_use]
    pub fn bus(&self) -> &Arc<dyn BusAttachment> {
        &self.bus
    }

    /// Returns a copy of the About metadata.
    #[must_use]
    pub fn about(&self) -> AboutData {
        self.about.read().clone()
    }

    /// Replaces the About metadata.
    ///
    /// Call [`announce`](Self::announce) afterwards to publish the change.
    pub fn set_about(&self, about: AboutData) {
        *self.about.write() = about;
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Registers an interface handler at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInterface` if the object already implements
    /// this interface.
    pub fn add_interface<H: InterfaceHandler>(&self, path: &ObjectPath, handler: H) -> Result<()> {
        let ty = handler.interface_type();
        let key = (path.clone(), ty);
        let mut objects = self.objects.write();
        if objects.contains_key(&key) {
            return Err(Error::DuplicateInterface {
                path: path.to_string(),
                interface: ty.name().to_string(),
            });
        }
        let handler: Box<dyn InterfaceHandler> = Box::new(handler);
        objects.insert(key, Arc::new(Mutex::new(handler)));
        tracing::debug!(%path, interface = %ty, "Interface registered");
        Ok(())
    }

    /// Unregisters an interface handler.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the handler is not registered.
    pub fn remove_interface(&self, path: &ObjectPath, ty: InterfaceType) -> Result<()> {
        let mut objects = self.objects.write();
        if objects.remove(&(path.clone(), ty)).is_none() {
            return Err(not_found(&objects, path, ty));
        }
        tracing::debug!(%path, interface = %ty, "Interface removed");
        Ok(())
    }

    /// Returns the paths of every object with at least one interface.
    #[must_use]
    pub fn object_paths(&self) -> Vec<ObjectPath> {
        let mut paths: Vec<ObjectPath> = self
            .objects
            .read()
            .keys()
            .map(|(path, _)| path.clone())
            .collect();
        paths.dedup();
        paths
    }

    /// Returns the interfaces registered at `path`.
    #[must_use]
    pub fn interfaces(&self, path: &ObjectPath) -> Vec<InterfaceType> {
        self.objects
            .read()
            .keys()
            .filter(|(p, _)| p == path)
            .map(|(_, ty)| *ty)
            .collect()
    }

    /// Returns `true` if `path` implements `ty`.
    #[must_use]
    pub fn has_interface(&self, path: &ObjectPath, ty: InterfaceType) -> bool {
        self.objects.read().contains_key(&(path.clone(), ty))
    }

    /// Describes every registered object, as announced.
    #[must_use]
    pub fn object_description(&self) -> ObjectDescription {
        let mut description = ObjectDescription::new();
        for (path, ty) in self.objects.read().keys() {
            description.add(path, ty.name());
        }
        description
    }

    fn handler(&self, path: &ObjectPath, ty: InterfaceType) -> Result<SharedHandler> {
        let objects = self.objects.read();
        objects
            .get(&(path.clone(), ty))
            .cloned()
            .ok_or_else(|| not_found(&objects, path, ty))
    }

    // =========================================================================
    // Typed Access
    // =========================================================================

    /// Runs `f` on the handler of interface `T` at `path`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the handler is not registered.
    pub fn read<T: Interface, R>(&self, path: &ObjectPath, f: impl FnOnce(&T) -> R) -> Result<R> {
        let handler = self.handler(path, T::INTERFACE_TYPE)?;
        let guard = handler.lock();
        let any: &dyn Any = &**guard;
        let iface = any
            .downcast_ref::<T>()
            .ok_or_else(|| wrong_type(path, T::INTERFACE_TYPE))?;
        Ok(f(iface))
    }

    /// Runs `f` on the handler of interface `T` at `path`, then announces
    /// what changed.
    ///
    /// `PropertiesChanged` is sent for every emitting property whose cached
    /// value differs afterwards, followed by the signals the handler queued.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the handler is not registered.
    pub fn update<T: Interface, R>(
        &self,
        path: &ObjectPath,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R> {
        let handler = self.handler(path, T::INTERFACE_TYPE)?;
        let (result, signals) = {
            let mut guard = handler.lock();
            let before = snapshot(&**guard);
            let any: &mut dyn Any = &mut **guard;
            let iface = any
                .downcast_mut::<T>()
                .ok_or_else(|| wrong_type(path, T::INTERFACE_TYPE))?;
            let result = f(iface);
            (result, collect_signals(path, &mut **guard, before))
        };
        self.send_signals(signals);
        Ok(result)
    }

    /// Like [`update`](Self::update), for closures that can fail.
    ///
    /// # Errors
    ///
    /// Returns a lookup error, or the error returned by `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cdm_controllee::Controllee;
    /// use cdm_controllee::about::AboutData;
    /// use cdm_controllee::bus::LoopbackBus;
    /// use cdm_controllee::interface::operation::{FanSpeedLevel, FanSpeedLevelProperties};
    /// use cdm_controllee::types::{AutoMode, ObjectPath};
    ///
    /// let controllee = Controllee::new(Arc::new(LoopbackBus::new(":1.3")), AboutData::new("en"));
    /// let path = ObjectPath::new("/Cdm/Fan").unwrap();
    /// controllee
    ///     .add_interface(&path, FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::Off)))
    ///     .unwrap();
    ///
    /// let result = controllee.try_update::<FanSpeedLevel, _, _>(&path, |fan| {
    ///     fan.properties_mut().set_fan_speed_level(9)
    /// });
    /// assert!(result.is_err());
    /// ```
    pub fn try_update<T, R, E>(
        &self,
        path: &ObjectPath,
        f: impl FnOnce(&mut T) -> std::result::Result<R, E>,
    ) -> Result<R>
    where
        T: Interface,
        Error: From<E>,
    {
        Ok(self.update(path, f)??)
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Sends an interface signal on behalf of the application.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the interface is not registered at `path`,
    /// `Error::UnknownMember` if the interface has no such signal, a marshal
    /// error if `args` do not match its signature, or the bus error.
    pub fn emit_signal(
        &self,
        path: &ObjectPath,
        ty: InterfaceType,
        member: &str,
        args: Vec<Value>,
    ) -> Result<()> {
        self.handler(path, ty)?;
        let descriptor = ty.descriptor();
        let signal = descriptor
            .signal(member)
            .ok_or_else(|| Error::UnknownMember {
                interface: ty.name().to_string(),
                member: member.to_string(),
            })?;
        check_signature(&signal.signature(), &args)?;

        let mut message = Signal::new(path.clone(), ty.name(), member, args);
        if signal.sessionless {
            message = message.sessionless();
        }
        self.bus.send_signal(message)?;
        tracing::debug!(%path, interface = %ty, member, "Signal emitted");
        Ok(())
    }

    /// Sends the sessionless `Announce` signal.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for session port 0, a value error if
    /// mandatory About fields are missing, or the bus error.
    pub fn announce(&self) -> Result<()> {
        if self.session_port == 0 {
            return Err(ConfigError::Invalid("session_port must not be 0".to_string()).into());
        }
        let announced = {
            let about = self.about.read();
            about.validate()?;
            about.announced_dict()
        };
        let description = self.object_description();
        let signal = Signal::new(
            ObjectPath::new(ABOUT_PATH)?,
            ABOUT_INTERFACE,
            "Announce",
            vec![
                Value::UInt16(ABOUT_VERSION),
                Value::UInt16(self.session_port),
                description.to_value(),
                announced,
            ],
        )
        .sessionless();
        self.bus.send_signal(signal)?;
        tracing::debug!(
            port = self.session_port,
            objects = description.paths().count(),
            "About announced"
        );
        Ok(())
    }

    fn send_signals(&self, signals: Vec<Signal>) {
        for signal in signals {
            let path = signal.path.clone();
            let member = signal.member.clone();
            match self.bus.send_signal(signal) {
                Ok(()) => tracing::trace!(%path, %member, "Signal sent"),
                Err(e) => tracing::warn!(%path, %member, error = %e, "Failed to send signal"),
            }
        }
    }
}

impl fmt::Debug for Controllee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controllee")
            .field("unique_name", &self.bus.unique_name())
            .field("session_port", &self.session_port)
            .field("interfaces", &self.objects.read().len())
            .finish_non_exhaustive()
    }
}

fn not_found(
    objects: &BTreeMap<(ObjectPath, InterfaceType), SharedHandler>,
    path: &ObjectPath,
    ty: InterfaceType,
) -> Error {
    if objects.keys().any(|(p, _)| p == path) {
        Error::InterfaceNotFound {
            path: path.to_string(),
            interface: ty.name().to_string(),
        }
    } else {
        Error::ObjectNotFound(path.to_string())
    }
}

fn wrong_type(path: &ObjectPath, ty: InterfaceType) -> Error {
    Error::InterfaceNotFound {
        path: path.to_string(),
        interface: ty.name().to_string(),
    }
}

fn snapshot(handler: &dyn InterfaceHandler) -> Snapshot {
    handler
        .interface_type()
        .descriptor()
        .emitting_properties()
        .map(|p| (p.name, handler.property(p.name)))
        .collect()
}

/// Builds the signals announcing what changed since `before`.
fn collect_signals(
    path: &ObjectPath,
    handler: &mut dyn InterfaceHandler,
    before: Snapshot,
) -> Vec<Signal> {
    let ty = handler.interface_type();
    let descriptor = ty.descriptor();

    let changed: Vec<(String, Value)> = before
        .into_iter()
        .filter_map(|(name, old)| {
            let new = handler.property(name)?;
            (old.as_ref() != Some(&new)).then(|| (name.to_string(), new))
        })
        .collect();

    let mut signals = Vec::new();
    if !changed.is_empty() {
        tracing::trace!(%path, interface = %ty, count = changed.len(), "Properties changed");
        signals.push(Signal::properties_changed(path.clone(), ty.name(), changed));
    }

    for PendingSignal { member, args } in handler.drain_signals() {
        let Some(signal) = descriptor.signal(member) else {
            tracing::warn!(%path, interface = %ty, member, "Dropping undeclared signal");
            continue;
        };
        let mut message = Signal::new(path.clone(), ty.name(), member, args);
        if signal.sessionless {
            message = message.sessionless();
        }
        signals.push(message);
    }
    signals
}

/// Checks that a list of values has the given concatenated signature.
fn check_signature(expected: &str, args: &[Value]) -> Result<()> {
    let actual: String = args.iter().map(|v| v.signature().to_string()).collect();
    if actual == expected {
        Ok(())
    } else {
        Err(MarshalError::SignatureMismatch {
            expected: expected.to_string(),
            actual,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::LoopbackBus;
    use crate::error::{BusError, ValueError};
    use crate::interface::operation::{
        Channel, ChannelProperties, CycleControl, CycleControlProperties, CycleState,
        FanSpeedLevel, FanSpeedLevelProperties, OnOffStatus,
    };
    use crate::types::AutoMode;

    fn setup() -> (Arc<LoopbackBus>, Controllee) {
        let bus = Arc::new(LoopbackBus::new(":1.1"));
        let controllee = Controllee::new(bus.clone(), AboutData::new("en"));
        (bus, controllee)
    }

    fn path(p: &str) -> ObjectPath {
        ObjectPath::new(p).unwrap()
    }

    fn fan() -> FanSpeedLevel {
        FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::Off))
    }

    #[test]
    fn duplicate_interface_is_rejected() {
        let (_bus, controllee) = setup();
        let fan_path = path("/Cdm/Fan");
        controllee.add_interface(&fan_path, fan()).unwrap();
        let err = controllee.add_interface(&fan_path, fan()).unwrap_err();
        assert!(matches!(err, Error::DuplicateInterface { .. }));

        // Same interface on another object is fine
        controllee.add_interface(&path("/Cdm/Fan2"), fan()).unwrap();
        assert_eq!(controllee.object_paths().len(), 2);
    }

    #[test]
    fn registry_queries() {
        let (_bus, controllee) = setup();
        let fan_path = path("/Cdm/Fan");
        controllee.add_interface(&fan_path, fan()).unwrap();
        controllee
            .add_interface(&fan_path, OnOffStatus::new(false))
            .unwrap();

        assert_eq!(
            controllee.interfaces(&fan_path),
            vec![InterfaceType::FanSpeedLevel, InterfaceType::OnOffStatus]
        );
        assert!(controllee.has_interface(&fan_path, InterfaceType::OnOffStatus));
        assert!(!controllee.has_interface(&fan_path, InterfaceType::Timer));
        assert_eq!(controllee.object_paths(), vec![fan_path.clone()]);

        controllee
            .remove_interface(&fan_path, InterfaceType::OnOffStatus)
            .unwrap();
        assert!(!controllee.has_interface(&fan_path, InterfaceType::OnOffStatus));
        let err = controllee
            .remove_interface(&fan_path, InterfaceType::OnOffStatus)
            .unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound { .. }));
    }

    #[test]
    fn lookup_distinguishes_missing_object() {
        let (_bus, controllee) = setup();
        let err = controllee
            .read::<FanSpeedLevel, _>(&path("/Nowhere"), |_| ())
            .unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound(_)));
    }

    #[test]
    fn update_emits_only_changed_properties() {
        let (bus, controllee) = setup();
        let mut signals = bus.subscribe();
        let fan_path = path("/Cdm/Fan");
        controllee.add_interface(&fan_path, fan()).unwrap();

        controllee
            .try_update::<FanSpeedLevel, _, _>(&fan_path, |fan| {
                fan.properties_mut().set_fan_speed_level(2)
            })
            .unwrap();

        let signal = signals.try_recv().unwrap();
        assert_eq!(signal.changed_property("FanSpeedLevel"), Some(&Value::Byte(2)));
        assert!(signal.changed_property("MaxFanSpeedLevel").is_none());
        assert!(signals.try_recv().is_err());
    }

    #[test]
    fn unchanged_update_is_silent() {
        let (bus, controllee) = setup();
        let fan_path = path("/Cdm/Fan");
        controllee.add_interface(&fan_path, fan()).unwrap();

        controllee
            .update::<FanSpeedLevel, _>(&fan_path, |fan| fan.properties().fan_speed_level())
            .unwrap();
        assert_eq!(bus.sent_count(), 0);
    }

    #[test]
    fn failed_update_keeps_cache() {
        let (bus, controllee) = setup();
        let fan_path = path("/Cdm/Fan");
        controllee.add_interface(&fan_path, fan()).unwrap();

        let err = controllee
            .try_update::<FanSpeedLevel, _, _>(&fan_path, |fan| {
                fan.properties_mut().set_fan_speed_level(4)
            })
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::OutOfRange { .. })));

        let level = controllee
            .read::<FanSpeedLevel, _>(&fan_path, |fan| fan.properties().fan_speed_level())
            .unwrap();
        assert_eq!(level, 0);
        assert_eq!(bus.sent_count(), 0);
    }

    #[test]
    fn entering_end_of_cycle_emits_signal() {
        let (bus, controllee) = setup();
        let mut signals = bus.subscribe();
        let washer = path("/Cdm/Washer");
        let properties = CycleControlProperties::new(
            CycleState::Working,
            vec![CycleState::Idle, CycleState::Working, CycleState::EndOfCycle],
            Vec::new(),
        )
        .unwrap();
        controllee
            .add_interface(&washer, CycleControl::new(properties))
            .unwrap();

        controllee
            .try_update::<CycleControl, _, _>(&washer, |cycle| {
                cycle
                    .properties_mut()
                    .set_operational_state(CycleState::EndOfCycle)
            })
            .unwrap();

        let changed = signals.try_recv().unwrap();
        assert_eq!(changed.member, "PropertiesChanged");
        let end = signals.try_recv().unwrap();
        assert_eq!(end.member, "EndOfCycle");
        assert!(end.sessionless);
    }

    #[test]
    fn emit_signal_validates_against_descriptor() {
        let (bus, controllee) = setup();
        let tv = path("/Cdm/Tv");
        controllee
            .add_interface(&tv, Channel::new(ChannelProperties::new("1", 10).unwrap()))
            .unwrap();

        controllee
            .emit_signal(&tv, InterfaceType::Channel, "ChannelListChanged", Vec::new())
            .unwrap();
        assert_eq!(bus.sent_count(), 1);

        let err = controllee
            .emit_signal(&tv, InterfaceType::Channel, "Bogus", Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMember { .. }));

        let err = controllee
            .emit_signal(
                &tv,
                InterfaceType::Channel,
                "ChannelListChanged",
                vec![Value::Byte(1)],
            )
            .unwrap_err();
        assert!(matches!(err, Error::Marshal(_)));

        let err = controllee
            .emit_signal(&tv, InterfaceType::Alerts, "AlertsChanged", Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound { .. }));
    }

    #[test]
    fn announce_requires_valid_about() {
        let (_bus, controllee) = setup();
        let err = controllee.announce().unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::Empty("DeviceId"))));
    }

    #[test]
    fn announce_rejects_port_zero() {
        let about = AboutData::new("en")
            .with_device_id("oven-1")
            .with_app_name("Oven")
            .with_manufacturer("Acme")
            .with_model_number("OV-1")
            .with_description("Test oven")
            .with_software_version("1.0");
        let bus = Arc::new(LoopbackBus::new(":1.3"));
        let controllee = Controllee::new(bus.clone(), about.clone()).with_session_port(0);
        let err = controllee.announce().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
        assert_eq!(bus.sent_count(), 0);

        let controllee = Controllee::new(bus.clone(), about).with_session_port(42);
        controllee.announce().unwrap();
        assert_eq!(bus.sent_count(), 1);
    }

    #[test]
    fn disconnected_bus_fails_emit() {
        let (bus, controllee) = setup();
        let tv = path("/Cdm/Tv");
        controllee
            .add_interface(&tv, Channel::new(ChannelProperties::new("1", 10).unwrap()))
            .unwrap();
        bus.set_connected(false);
        let err = controllee
            .emit_signal(&tv, InterfaceType::Channel, "ChannelListChanged", Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::Bus(BusError::NotConnected)));
    }
}
