//! Registry of live particle effects.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;

use super::effect::{ParticleBlend, ParticleEffect, ParticleError};

/// All particle effects in the world, keyed by id.
///
/// Iteration, update and drawing follow ascending id order.
#[derive(Resource, Debug, Default)]
pub struct ParticlesManager {
    effects: BTreeMap<i32, ParticleEffect>,
}

impl ParticlesManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect under its own id.
    pub fn add(&mut self, effect: ParticleEffect) -> Result<i32, ParticleError> {
        let id = effect.id();
        if self.effects.contains_key(&id) {
            return Err(ParticleError::DuplicateId(id));
        }
        log::debug!("Particle effect {} ({:?}) added", id, effect.kind());
        self.effects.insert(id, effect);
        Ok(id)
    }

    /// Register an effect under `id`, overriding the id it was built with.
    pub fn add_with_id(
        &mut self,
        id: i32,
        mut effect: ParticleEffect,
    ) -> Result<i32, ParticleError> {
        effect.set_id(id);
        self.add(effect)
    }

    pub fn remove(&mut self, id: i32) -> Option<ParticleEffect> {
        let removed = self.effects.remove(&id);
        if removed.is_some() {
            log::debug!("Particle effect {} removed", id);
        }
        removed
    }

    pub fn get(&self, id: i32) -> Option<&ParticleEffect> {
        self.effects.get(&id)
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut ParticleEffect> {
        self.effects.get_mut(&id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.effects.contains_key(&id)
    }

    /// Clear the particles of one effect, or of all effects with `None`.
    pub fn reset(&mut self, id: Option<i32>) {
        match id {
            Some(id) => {
                if let Some(effect) = self.effects.get_mut(&id) {
                    effect.reset();
                }
            }
            None => self.effects.values_mut().for_each(ParticleEffect::reset),
        }
    }

    /// Advance every enabled effect, then drop the disposed ones.
    pub fn update(&mut self, dt: f32) {
        for effect in self.effects.values_mut().filter(|e| e.enabled) {
            effect.update(dt);
        }
        self.effects.retain(|id, effect| {
            if effect.is_ready_to_dispose() {
                log::debug!("Particle effect {} disposed", id);
                false
            } else {
                true
            }
        });
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Effects with something to draw, paired with their blend mode.
    pub fn draw_batches(&self) -> impl Iterator<Item = (ParticleBlend, &ParticleEffect)> {
        self.effects
            .values()
            .filter(|e| !e.particles().is_empty())
            .map(|e| (e.blend(), e))
    }

    /// Live particles across all effects.
    pub fn particle_count(&self) -> usize {
        self.effects.values().map(|e| e.particles().len()).sum()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;
    use crate::resources::particles::effect::EffectKind;

    fn effect(id: i32, kind: EffectKind) -> ParticleEffect {
        ParticleEffect::new(id, kind, vec!["p".to_string()])
            .unwrap()
            .with_seed(id as u64)
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut pm = ParticlesManager::new();
        pm.add(effect(1, EffectKind::SpreadBeam)).unwrap();
        assert_eq!(
            pm.add(effect(1, EffectKind::Afterburner)).unwrap_err(),
            ParticleError::DuplicateId(1)
        );
        assert_eq!(pm.len(), 1);
    }

    #[test]
    fn add_with_id_overrides_effect_id() {
        let mut pm = ParticlesManager::new();
        pm.add_with_id(42, effect(1, EffectKind::SpreadBeam)).unwrap();
        assert!(pm.contains(42));
        assert!(!pm.contains(1));
        assert_eq!(pm.get(42).unwrap().id(), 42);
    }

    #[test]
    fn disabled_effects_do_not_age() {
        let mut pm = ParticlesManager::new();
        pm.add(effect(1, EffectKind::ExplosionSparks).with_enabled(false))
            .unwrap();
        pm.get_mut(1)
            .unwrap()
            .generate_explosion(vec2(0.0, 0.0), 0.0)
            .unwrap();
        let n = pm.particle_count();
        pm.update(10.0);
        assert_eq!(pm.particle_count(), n);
    }

    #[test]
    fn disposed_effects_are_dropped_after_update() {
        let mut pm = ParticlesManager::new();
        pm.add(effect(1, EffectKind::SpreadBeam)).unwrap();
        pm.add(effect(2, EffectKind::SpreadBeam)).unwrap();
        pm.get_mut(1).unwrap().mark_for_dispose();
        assert_eq!(pm.len(), 2);
        pm.update(0.016);
        assert_eq!(pm.len(), 1);
        assert!(pm.contains(2));
    }

    #[test]
    fn reset_targets_one_or_all() {
        let mut pm = ParticlesManager::new();
        for id in 1..=2 {
            pm.add(effect(id, EffectKind::SpreadBeam)).unwrap();
            pm.get_mut(id)
                .unwrap()
                .generate_particle(vec2(0.0, 0.0), 0.0)
                .unwrap();
        }
        pm.reset(Some(1));
        assert!(pm.get(1).unwrap().particles().is_empty());
        assert_eq!(pm.get(2).unwrap().particles().len(), 1);
        pm.reset(None);
        assert_eq!(pm.particle_count(), 0);
    }

    #[test]
    fn remove_hands_back_the_effect_once() {
        let mut pm = ParticlesManager::new();
        pm.add(effect(7, EffectKind::SpreadBeam)).unwrap();
        pm.get_mut(7)
            .unwrap()
            .generate_particle(vec2(0.0, 0.0), 0.0)
            .unwrap();

        let removed = pm.remove(7).unwrap();
        assert_eq!(removed.id(), 7);
        assert_eq!(removed.particles().len(), 1);
        assert!(!pm.contains(7));
        assert!(pm.is_empty());
        assert!(pm.remove(7).is_none());
        assert!(pm.remove(99).is_none());
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut pm = ParticlesManager::new();
        for id in 1..=3 {
            pm.add(effect(id, EffectKind::ExplosionSparks)).unwrap();
            pm.get_mut(id)
                .unwrap()
                .generate_explosion(vec2(0.0, 0.0), 10.0)
                .unwrap();
        }
        assert!(pm.particle_count() > 0);
        pm.clear();
        assert!(pm.is_empty());
        assert_eq!(pm.particle_count(), 0);
        assert_eq!(pm.draw_batches().count(), 0);
        // Ids are free again
        pm.add(effect(1, EffectKind::SpreadBeam)).unwrap();
        assert_eq!(pm.len(), 1);
    }

    #[test]
    fn draw_batches_skip_empty_effects_in_id_order() {
        let mut pm = ParticlesManager::new();
        pm.add(effect(5, EffectKind::ExplosionSmoke)).unwrap();
        pm.add(effect(3, EffectKind::SpreadBeam)).unwrap();
        pm.add(effect(4, EffectKind::Afterburner)).unwrap();
        pm.get_mut(5)
            .unwrap()
            .generate_explosion(vec2(0.0, 0.0), 0.0)
            .unwrap();
        pm.get_mut(3)
            .unwrap()
            .generate_particle(vec2(0.0, 0.0), 0.0)
            .unwrap();
        let batches: Vec<_> = pm.draw_batches().map(|(b, e)| (b, e.id())).collect();
        assert_eq!(
            batches,
            vec![(ParticleBlend::Additive, 3), (ParticleBlend::Alpha, 5)]
        );
    }
}
