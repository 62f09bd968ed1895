use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::collision::find_hits;
use crate::config::GameConfig;
use crate::entities::{Enemy, Entity, EntityId, Player, Projectile};
use crate::input::InputHandler;
use crate::spawner::{EnemySpawner, ProjectileSpawner};

/// Counters shown to the player. All but the high score reset on restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Simulation steps since the game (re)started.
    pub loop_count: u64,
    pub enemies_spawned: u64,
    pub enemies_hit: u64,
    /// Simulated time the current player has been alive.
    pub time_alive: Duration,
    pub score: u64,
    pub high_score: u64,
    /// Set once this run has beaten the previous high score.
    pub new_high_score: bool,
}

/// Owned simulation state: the entity table, its pending removals, the spawners
/// and the score counters.
///
/// Entities are stored by id in a `BTreeMap`. Ids only grow, so table order is
/// insertion order and every pass over the table is deterministic.
pub struct World {
    config: GameConfig,
    entities: BTreeMap<EntityId, Entity>,
    removal_queue: Vec<EntityId>,
    next_id: u64,
    player_id: EntityId,
    input: InputHandler,
    enemy_spawner: EnemySpawner,
    projectile_spawner: ProjectileSpawner,
    stats: Stats,
    rng: StdRng,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let mut world = Self {
            entities: BTreeMap::new(),
            removal_queue: Vec::new(),
            next_id: 0,
            player_id: EntityId(0),
            input: InputHandler::default(),
            enemy_spawner: EnemySpawner::new(),
            projectile_spawner: ProjectileSpawner::new(&config.tuning.projectile),
            stats: Stats::default(),
            rng,
            config,
        };
        world.start();
        world
    }

    /// Replaces the input handler, e.g. to enable the key hold fallback.
    pub fn with_input(mut self, input: InputHandler) -> Self {
        self.input = input;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| matches!(e, Entity::Enemy(_)))
            .count()
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn player(&self) -> Option<&Player> {
        match self.entities.get(&self.player_id) {
            Some(Entity::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match self.entities.get_mut(&self.player_id) {
            Some(Entity::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.player().is_none_or(Player::is_dead)
    }

    pub fn pending_removals(&self) -> &[EntityId] {
        &self.removal_queue
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts an entity built around a freshly allocated id.
    pub fn spawn(&mut self, build: impl FnOnce(EntityId, &GameConfig) -> Entity) -> EntityId {
        let id = self.allocate_id();
        let entity = build(id, &self.config);
        debug_assert_eq!(entity.id(), id);
        self.entities.insert(id, entity);
        id
    }

    /// Queues an entity for removal at the end of the current step.
    /// Queuing the same id twice, or an id that is already gone, is harmless.
    pub fn remove(&mut self, id: EntityId) {
        self.removal_queue.push(id);
    }

    /// Drops every queued entity from the table.
    pub fn purge_removed(&mut self) {
        for id in self.removal_queue.drain(..) {
            self.entities.remove(&id);
        }
    }

    /// (Re)starts the game: empty table, fresh spawners, new player, zeroed counters.
    /// The high score and the id counter carry over.
    pub fn start(&mut self) {
        self.entities.clear();
        self.removal_queue.clear();
        self.enemy_spawner = EnemySpawner::new();
        self.projectile_spawner = ProjectileSpawner::new(&self.config.tuning.projectile);
        self.stats = Stats {
            high_score: self.stats.high_score,
            ..Stats::default()
        };

        self.player_id = self.spawn(|id, config| {
            Entity::Player(Player::spawn(id, config.canvas, &config.tuning.player))
        });

        tracing::info!(
            player = %self.player_id,
            high_score = self.stats.high_score,
            "game started"
        );
    }

    /// Advances the simulation by one fixed step.
    pub fn update(&mut self, delta: Duration) {
        self.stats.loop_count += 1;

        // poll input
        if let Some(Entity::Player(player)) = self.entities.get_mut(&self.player_id) {
            self.input.poll_controller(&mut player.controller);
        }

        self.update_entities(delta);
        self.handle_collisions();
        self.purge_removed();
        self.run_spawners(delta);
        self.update_score(delta);

        // allow the player to restart when dead
        let restart = self
            .player()
            .is_some_and(|player| player.is_dead() && player.controller.action_1);
        if restart {
            self.start();
        }
    }

    fn update_entities(&mut self, delta: Duration) {
        let delta_secs = delta.as_secs_f32();
        let canvas = self.config.canvas;
        let tuning = self.config.tuning;
        let player_alive_before = !self.is_game_over();

        let mut enemies = Vec::new();
        for (&id, entity) in self.entities.iter_mut() {
            match entity {
                Entity::Player(player) => {
                    if !player.is_dead() {
                        player.update(delta_secs, canvas, &tuning.player);
                    }
                }
                Entity::Enemy(enemy) => {
                    if !enemy.update(delta_secs, canvas, &tuning.enemy) {
                        self.removal_queue.push(id);
                    }
                    enemies.push(id);
                }
                Entity::Projectile(projectile) => {
                    if !projectile.update(delta_secs, canvas, &tuning.projectile) {
                        self.removal_queue.push(id);
                    }
                }
            }
        }

        // damage on contact
        for id in enemies {
            let touching = match (self.entities.get(&id), self.player()) {
                (Some(enemy), Some(player)) => {
                    !player.is_dead() && enemy.body().overlaps(&player.body)
                }
                _ => false,
            };
            if touching {
                self.remove(id);
                if let Some(player) = self.player_mut() {
                    player.take_damage(tuning.enemy.contact_damage);
                    tracing::debug!(enemy = %id, health = player.body.health, "player hit");
                }
            }
        }

        if player_alive_before && self.is_game_over() {
            tracing::info!(
                score = self.stats.score,
                enemies_hit = self.stats.enemies_hit,
                time_alive_secs = self.stats.time_alive.as_secs(),
                "player destroyed"
            );
        }
    }

    fn handle_collisions(&mut self) {
        for hit in find_hits(&self.entities) {
            self.remove(hit.projectile);
            self.remove(hit.target);
            self.stats.enemies_hit += 1;
            tracing::trace!(projectile = %hit.projectile, target = %hit.target, "hit");
        }
    }

    fn run_spawners(&mut self, delta: Duration) {
        let wave = self.enemy_spawner.update(delta, &self.config.tuning.wave);
        for _ in 0..wave {
            let x = self.rng.random_range(1..=self.config.canvas.width.max(1.0) as u32) as f32;
            self.spawn(|id, config| Entity::Enemy(Enemy::new(id, x, &config.tuning.enemy)));
        }
        self.stats.enemies_spawned += wave as u64;

        let muzzle = self
            .player()
            .filter(|player| !player.is_dead())
            .map(|player| (player.body.position, player.controller.action_1));
        let firing = muzzle.is_some_and(|(_, action)| action);
        if self
            .projectile_spawner
            .update(delta, firing, &self.config.tuning.projectile)
        {
            if let Some((position, _)) = muzzle {
                self.spawn(|id, config| {
                    Entity::Projectile(Projectile::fire(id, position, &config.tuning.projectile))
                });
            }
        }
    }

    fn update_score(&mut self, delta: Duration) {
        if self.is_game_over() {
            return;
        }

        self.stats.time_alive += delta;
        self.stats.score = self.config.tuning.score.points_per_hit * self.stats.enemies_hit
            + self.stats.time_alive.as_secs();

        if self.stats.score > self.stats.high_score {
            if !self.stats.new_high_score {
                tracing::debug!(previous = self.stats.high_score, "new high score");
            }
            self.stats.high_score = self.stats.score;
            self.stats.new_high_score = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityKind, Vec2};
    use crossterm::event::KeyCode;
    use std::time::Instant;

    fn world() -> World {
        World::new(GameConfig::default())
    }

    fn step(world: &World) -> Duration {
        world.config().step()
    }

    #[test]
    fn test_new_world_has_only_player() {
        let world = world();
        assert_eq!(world.entity_count(), 1);
        let player = world.player().expect("player");
        assert_eq!(player.body.position, Vec2::new(150.0, 400.0));
        assert!(!world.is_game_over());
        assert_eq!(world.stats(), &Stats::default());
    }

    #[test]
    fn test_removal_is_deferred() {
        let mut world = world();
        let id = world.spawn(|id, config| Entity::Enemy(Enemy::new(id, 10.0, &config.tuning.enemy)));
        world.remove(id);
        assert!(world.entity(id).is_some());
        assert_eq!(world.pending_removals(), &[id]);

        world.purge_removed();
        assert!(world.entity(id).is_none());
        assert!(world.pending_removals().is_empty());
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut world = world();
        let keep = world.spawn(|id, config| Entity::Enemy(Enemy::new(id, 10.0, &config.tuning.enemy)));
        let gone = world.spawn(|id, config| Entity::Enemy(Enemy::new(id, 20.0, &config.tuning.enemy)));
        world.remove(gone);
        world.remove(gone);
        world.purge_removed();
        world.remove(gone);
        world.purge_removed();

        assert!(world.entity(gone).is_none());
        assert!(world.entity(keep).is_some());
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut world = world();
        let a = world.spawn(|id, config| Entity::Enemy(Enemy::new(id, 10.0, &config.tuning.enemy)));
        let b = world.spawn(|id, config| Entity::Enemy(Enemy::new(id, 10.0, &config.tuning.enemy)));
        assert!(world.player_id() < a && a < b);

        let ids: Vec<EntityId> = world.entities().map(Entity::id).collect();
        assert_eq!(ids, vec![world.player_id(), a, b]);
    }

    #[test]
    fn test_first_wave_on_seventh_step() {
        let mut world = world();
        let dt = step(&world);
        for _ in 0..6 {
            world.update(dt);
        }
        assert_eq!(world.enemy_count(), 0);

        world.update(dt);
        assert_eq!(world.enemy_count(), 4);
        assert_eq!(world.stats().enemies_spawned, 4);
        for enemy in world.entities().filter(|e| e.kind() == EntityKind::Enemy) {
            let x = enemy.body().position.x;
            assert!((1.0..=300.0).contains(&x));
            assert_eq!(enemy.body().position.y, -100.0);
        }
    }

    #[test]
    fn test_same_seed_same_waves() {
        let mut a = world();
        let mut b = world();
        let dt = step(&a);
        for _ in 0..20 {
            a.update(dt);
            b.update(dt);
        }
        let xs = |w: &World| -> Vec<f32> { w.entities().map(|e| e.body().position.x).collect() };
        assert_eq!(xs(&a), xs(&b));
    }

    #[test]
    fn test_holding_fire_spawns_projectile() {
        let mut world = world();
        world.input_mut().press(KeyCode::Char(' '), Instant::now());
        world.update(step(&world));

        let projectiles: Vec<&Entity> = world
            .entities()
            .filter(|e| e.kind() == EntityKind::Projectile)
            .collect();
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].body().position, Vec2::new(150.0, 386.0));
    }

    #[test]
    fn test_projectile_destroys_enemy_and_counts_hit() {
        let mut world = world();
        let enemy = world.spawn(|id, config| {
            let mut enemy = Enemy::new(id, 100.0, &config.tuning.enemy);
            enemy.body.position.y = 200.0;
            Entity::Enemy(enemy)
        });
        let projectile = world.spawn(|id, config| {
            Entity::Projectile(Projectile::fire(
                id,
                Vec2::new(100.0, 224.0),
                &config.tuning.projectile,
            ))
        });

        world.update(step(&world));

        assert!(world.entity(enemy).is_none());
        assert!(world.entity(projectile).is_none());
        assert_eq!(world.stats().enemies_hit, 1);
        assert_eq!(world.stats().score, 30);
    }

    #[test]
    fn test_enemy_contact_damages_player() {
        let mut world = world();
        let enemy = world.spawn(|id, config| {
            let mut enemy = Enemy::new(id, 150.0, &config.tuning.enemy);
            enemy.body.position.y = 395.0;
            Entity::Enemy(enemy)
        });

        world.update(step(&world));

        assert!(world.entity(enemy).is_none());
        assert_eq!(world.player().map(|p| p.body.health), Some(75));
    }

    #[test]
    fn test_enemy_removed_at_bottom() {
        let mut world = world();
        let enemy = world.spawn(|id, config| {
            let mut enemy = Enemy::new(id, 10.0, &config.tuning.enemy);
            enemy.body.position.y = 499.0;
            Entity::Enemy(enemy)
        });
        world.update(step(&world));
        assert!(world.entity(enemy).is_none());
    }

    #[test]
    fn test_dead_player_freezes_score_and_stays_in_table() {
        let mut world = world();
        let dt = step(&world);
        for _ in 0..120 {
            world.update(dt);
        }
        if let Some(player) = world.player_mut() {
            player.take_damage(100);
        }
        let score = world.stats().score;
        world.update(dt);

        assert!(world.is_game_over());
        assert!(world.player().is_some());
        assert_eq!(world.stats().score, score);
    }

    #[test]
    fn test_dead_player_does_not_move_or_fire() {
        let mut world = world();
        if let Some(player) = world.player_mut() {
            player.take_damage(100);
        }
        world.input_mut().press(KeyCode::Char('d'), Instant::now());
        world.update(step(&world));

        // Space was not held, so no restart either
        assert_eq!(
            world.player().map(|p| p.body.position),
            Some(Vec2::new(150.0, 400.0))
        );
        assert_eq!(
            world
                .entities()
                .filter(|e| e.kind() == EntityKind::Projectile)
                .count(),
            0
        );
    }

    #[test]
    fn test_action_restarts_dead_player() {
        let mut world = world();
        let dt = step(&world);
        for _ in 0..90 {
            world.update(dt);
        }
        let old_player = world.player_id();
        if let Some(player) = world.player_mut() {
            player.take_damage(100);
        }
        world.input_mut().press(KeyCode::Char(' '), Instant::now());
        world.update(dt);

        assert!(!world.is_game_over());
        assert_ne!(world.player_id(), old_player);
        assert_eq!(world.entity_count(), 1);
        let stats = world.stats();
        assert_eq!(stats.loop_count, 0);
        assert_eq!(stats.enemies_spawned, 0);
        assert_eq!(stats.enemies_hit, 0);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.time_alive, Duration::ZERO);
        assert!(!stats.new_high_score);
        assert_eq!(stats.high_score, 1);
    }

    #[test]
    fn test_score_counts_whole_seconds_alive() {
        let mut world = world();
        let dt = step(&world);
        for _ in 0..61 {
            world.update(dt);
        }
        assert!(world.stats().time_alive >= Duration::from_secs(1));
        assert_eq!(world.stats().score, 1 + 30 * world.stats().enemies_hit);
        assert_eq!(world.stats().high_score, world.stats().score);
        assert!(world.stats().new_high_score);
    }
}
