use crate::collision::{Contact, ContactList, Geom, GeomPair};

/// The contacts of one colliding pair for one step, with the material
/// values a solver needs to respond to them
#[derive(Debug, Clone)]
pub struct Arbiter {
    /// The colliding pair
    pub pair: GeomPair,

    /// Contacts, normals pointing from `pair.geom_a` toward `pair.geom_b`
    pub contacts: ContactList,

    /// Geometric mean of both friction coefficients
    pub friction: f32,

    /// The larger of both restitution coefficients
    pub restitution: f32,

    /// False when either side is a sensor or has response disabled
    pub response_enabled: bool,
}

impl Arbiter {
    /// Creates an arbiter for `pair` from its two geometries, in pair order
    pub fn new(pair: GeomPair, geom_a: &Geom, geom_b: &Geom, contacts: ContactList) -> Self {
        let friction = (geom_a.friction_coefficient() * geom_b.friction_coefficient()).sqrt();
        let restitution = geom_a.restitution_coefficient().max(geom_b.restitution_coefficient());
        let response_enabled = !geom_a.is_sensor()
            && !geom_b.is_sensor()
            && geom_a.collision_response_enabled()
            && geom_b.collision_response_enabled();

        Self {
            pair,
            contacts,
            friction,
            restitution,
            response_enabled,
        }
    }

    /// Replaces the contacts with this step's, carrying accumulated impulses
    /// over from contacts with the same id
    pub fn update(&mut self, mut contacts: ContactList) {
        for contact in contacts.iter_mut() {
            if let Some(previous) = self.find_contact(contact) {
                contact.normal_impulse = previous.normal_impulse;
                contact.tangent_impulse = previous.tangent_impulse;
            }
        }
        self.contacts = contacts;
    }

    fn find_contact(&self, contact: &Contact) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == contact.id)
    }

    /// Deepest penetration among the contacts, or 0 without contacts
    pub fn max_penetration(&self) -> f32 {
        self.contacts
            .iter()
            .map(|c| -c.separation)
            .fold(0.0, f32::max)
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::Body;
    use crate::collision::ContactId;
    use crate::core::{BodyHandle, GeomHandle, Handle};
    use crate::math::Vector2;
    use crate::shapes::factory;
    use approx::assert_relative_eq;

    fn geom(friction: f32, restitution: f32) -> Geom {
        let body = Body::new_dynamic(Vector2::ZERO);
        let mut geom = Geom::new(BodyHandle::from_raw_parts(0, 0), &body, factory::rectangle(1.0, 1.0), 0.0);
        geom.set_friction_coefficient(friction);
        geom.set_restitution_coefficient(restitution);
        geom
    }

    fn pair() -> GeomPair {
        GeomPair::new(GeomHandle::from_raw_parts(0, 0), GeomHandle::from_raw_parts(1, 0))
    }

    #[test]
    fn material_mixing() {
        let arbiter = Arbiter::new(pair(), &geom(0.4, 0.2), &geom(0.9, 0.5), ContactList::new());
        assert_relative_eq!(arbiter.friction, 0.6, epsilon = 1e-6);
        assert_relative_eq!(arbiter.restitution, 0.5);
        assert!(arbiter.response_enabled);
    }

    #[test]
    fn sensors_disable_response() {
        let mut sensor = geom(0.0, 0.0);
        sensor.set_sensor(true);
        let arbiter = Arbiter::new(pair(), &sensor, &geom(0.0, 0.0), ContactList::new());
        assert!(!arbiter.response_enabled);
    }

    #[test]
    fn update_keeps_impulses_by_id() {
        let p = pair();
        let id = ContactId::new(p.geom_a, 2, p.geom_b);
        let mut first = Contact::new(Vector2::ZERO, Vector2::unit_y(), -0.1, id);
        first.normal_impulse = 3.0;

        let mut arbiter = Arbiter::new(p, &geom(0.0, 0.0), &geom(0.0, 0.0), vec![first]);
        arbiter.update(vec![Contact::new(Vector2::new(0.1, 0.0), Vector2::unit_y(), -0.2, id)]);

        assert_relative_eq!(arbiter.contacts[0].normal_impulse, 3.0);
        assert_relative_eq!(arbiter.max_penetration(), 0.2);
    }
}
