//! Which pins belong to which port of a switch


use protocol::pin::Pin;

use crate::ValidationError;


/// Port maps for the switches as they are wired in the lab
///
/// Each entry maps a port name to its reset pin and set pin. All ports of a
/// switch share one reset pin.
pub const PRESETS: &[(&str, &[(&str, u8, u8)])] = &[
    // one cable tie
    ("sw0", &[("P1", 13, 11), ("P2", 13, 12), ("P3", 13, 15), ("P4", 13, 16)]),
    // two cable ties
    ("sw1", &[("P1", 26, 21), ("P2", 26, 22), ("P3", 26, 23), ("P4", 26, 24)]),
];


/// The pins of a single port
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PortPins {
    pub name:      String,
    pub reset_pin: Pin,
    pub set_pin:   Pin,
}


/// The ordered list of ports of a switch, and their pins
///
/// The order of ports here is the order in which a switch visits them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PortMap {
    ports: Vec<PortPins>,
}

impl PortMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one of the [`PRESETS`]
    pub fn preset(name: &str) -> Result<Self, ValidationError> {
        let (_, ports) = PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .ok_or_else(|| ValidationError::UnknownPreset(name.to_owned()))?;

        Ok(
            ports
                .iter()
                .map(|&(port, reset, set)| (port, Pin(reset), Pin(set)))
                .collect()
        )
    }

    /// Add a port to the end of the map
    pub fn with_port(mut self,
        name:      impl Into<String>,
        reset_pin: Pin,
        set_pin:   Pin,
    )
        -> Self
    {
        self.ports.push(PortPins { name: name.into(), reset_pin, set_pin });
        self
    }

    pub fn ports(&self) -> &[PortPins] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Check that a switch can be built from this map
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ports.is_empty() {
            return Err(ValidationError::EmptyPortMap);
        }

        for (i, port) in self.ports.iter().enumerate() {
            if port.reset_pin == port.set_pin {
                return Err(
                    ValidationError::PinConflict {
                        port: port.name.clone(),
                        pin:  port.set_pin,
                    }
                );
            }
            if self.ports[..i].iter().any(|other| other.name == port.name) {
                return Err(ValidationError::DuplicatePort(port.name.clone()));
            }

            // Reset pins may be shared, set pins may not. A set pin that
            // belongs to another port as well would connect both.
            let set_pin_shared = self.ports
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .any(|(_, other)| {
                    other.set_pin == port.set_pin
                        || other.reset_pin == port.set_pin
                });
            if set_pin_shared {
                return Err(
                    ValidationError::SetPinShared {
                        port: port.name.clone(),
                        pin:  port.set_pin,
                    }
                );
            }
        }

        Ok(())
    }

    /// Every pin used by this map, in port order, possibly repeated
    pub fn pins(&self) -> impl Iterator<Item=Pin> + '_ {
        self.ports
            .iter()
            .flat_map(|port| vec![port.reset_pin, port.set_pin])
    }

    /// The first pin of this map that `other` uses too, if any
    pub fn shared_pin(&self, other: &PortMap) -> Option<Pin> {
        self.pins().find(|&pin| other.pins().any(|theirs| theirs == pin))
    }
}

impl<S> std::iter::FromIterator<(S, Pin, Pin)> for PortMap
    where S: Into<String>
{
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item=(S, Pin, Pin)>
    {
        iter.into_iter()
            .fold(Self::new(), |map, (name, reset_pin, set_pin)| {
                map.with_port(name, reset_pin, set_pin)
            })
    }
}


#[cfg(test)]
mod tests {
    use protocol::pin::Pin;

    use crate::ValidationError;

    use super::PortMap;


    #[test]
    fn it_should_resolve_presets() {
        let map = PortMap::preset("sw1").unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.ports()[2].name, "P3");
        assert_eq!(map.ports()[2].reset_pin, Pin(26));
        assert_eq!(map.ports()[2].set_pin, Pin(23));
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn it_should_reject_unknown_presets() {
        assert_eq!(
            PortMap::preset("sw9"),
            Err(ValidationError::UnknownPreset("sw9".into())),
        );
    }

    #[test]
    fn it_should_reject_broken_maps() {
        assert_eq!(PortMap::new().validate(), Err(ValidationError::EmptyPortMap));

        let map = PortMap::new().with_port("A", Pin(1), Pin(1));
        assert_eq!(
            map.validate(),
            Err(ValidationError::PinConflict { port: "A".into(), pin: Pin(1) }),
        );

        let map = PortMap::new()
            .with_port("A", Pin(1), Pin(2))
            .with_port("A", Pin(3), Pin(4));
        assert_eq!(
            map.validate(),
            Err(ValidationError::DuplicatePort("A".into())),
        );
    }

    #[test]
    fn it_should_reject_set_pins_used_by_other_ports() {
        let map = PortMap::new()
            .with_port("A", Pin(1), Pin(2))
            .with_port("B", Pin(3), Pin(2));
        assert_eq!(
            map.validate(),
            Err(ValidationError::SetPinShared { port: "A".into(), pin: Pin(2) }),
        );

        let map = PortMap::new()
            .with_port("A", Pin(1), Pin(2))
            .with_port("B", Pin(2), Pin(4));
        assert_eq!(
            map.validate(),
            Err(ValidationError::SetPinShared { port: "A".into(), pin: Pin(2) }),
        );

        // A shared reset pin is fine
        let map = PortMap::new()
            .with_port("A", Pin(1), Pin(2))
            .with_port("B", Pin(1), Pin(4));
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn it_should_find_pins_shared_between_maps() {
        let sw0 = PortMap::preset("sw0").unwrap();
        let sw1 = PortMap::preset("sw1").unwrap();
        assert_eq!(sw0.shared_pin(&sw1), None);

        let other = PortMap::new().with_port("X", Pin(30), Pin(15));
        assert_eq!(sw0.shared_pin(&other), Some(Pin(15)));
    }
}
