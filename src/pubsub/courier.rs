use std::{fmt, sync::Arc};

use courier_error::DeliverError;
use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::{Context, Delivery, Handler, RegistryConfig, Subscription};

type RouteKey = Arc<str>;

/// Именованный узел pub/sub: набор маршрутов со списками подписок.
///
/// Создаётся только через [`Registry`](super::Registry), поэтому для одного
/// имени существует не более одного курьера. Все методы управления
/// маршрутами возвращают `&Self` для цепочек вызовов:
///
/// ```
/// use courier::{Delivery, Handler, Registry};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// let bus = registry.get_or_create("bus").unwrap();
/// bus.on("tick", Handler::new(|d: &Delivery<'_>| {
///     assert_eq!(d.args(), &[json!(42)]);
///     Ok(())
/// }))
/// .deliver("tick", &[json!(42)])
/// .unwrap();
/// ```
pub struct Courier<T = Value> {
    name: Arc<str>,
    /// Маршрут → подписки в порядке регистрации
    routes: DashMap<RouteKey, Vec<Subscription<T>>>,
    config: RegistryConfig,
}

impl<T> Courier<T> {
    pub(crate) fn new(
        name: Arc<str>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            name,
            routes: DashMap::new(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Регистрирует подписку на маршрут.
    ///
    /// - пустое имя маршрута: ничего не делает;
    /// - маршрут создаётся, если его ещё нет;
    /// - без `handler` только объявляет маршрут (ноль подписчиков);
    /// - дубликаты разрешены: та же пара будет вызвана дважды.
    pub fn schedule(
        &self,
        route: &str,
        handler: Option<Handler<T>>,
        context: Option<Context>,
    ) -> &Self {
        if route.is_empty() {
            return self;
        }

        let mut entry = match self.routes.get_mut(route) {
            Some(entry) => entry,
            None => self
                .routes
                .entry(Arc::from(route))
                .or_insert_with(|| Vec::with_capacity(self.config.route_capacity)),
        };

        if let Some(handler) = handler {
            entry.push(Subscription::new(handler, context));
            trace!(
                courier = %self.name,
                route,
                subscribers = entry.len(),
                "subscription scheduled"
            );
        } else {
            trace!(courier = %self.name, route, "route declared");
        }
        self
    }

    /// Подписка без контекста.
    pub fn on(
        &self,
        route: &str,
        handler: Handler<T>,
    ) -> &Self {
        self.schedule(route, Some(handler), None)
    }

    /// Объявляет маршрут без подписчиков.
    pub fn declare(
        &self,
        route: &str,
    ) -> &Self {
        self.schedule(route, None, None)
    }

    /// Удаляет не более одной подписки, просматривая маршрут с конца.
    ///
    /// Без `handler` удаляется последняя подписка маршрута. С `handler`
    /// удаляется последняя подписка с тем же обработчиком и тем же
    /// контекстом (`None` совпадает только с `None`).
    pub fn cancel(
        &self,
        route: &str,
        handler: Option<&Handler<T>>,
        context: Option<&Context>,
    ) -> &Self {
        if route.is_empty() {
            return self;
        }
        let Some(mut subs) = self.routes.get_mut(route) else {
            return self;
        };

        let position = match handler {
            None => subs.len().checked_sub(1),
            Some(handler) => subs.iter().rposition(|s| s.matches(handler, context)),
        };

        if let Some(index) = position {
            // `Vec::remove` сдвигает хвост, порядок остальных сохраняется
            subs.remove(index);
            debug!(
                courier = %self.name,
                route,
                index,
                remaining = subs.len(),
                "subscription cancelled"
            );
        }
        self
    }

    /// Синхронно вызывает все подписки маршрута в порядке регистрации.
    ///
    /// Перед обходом берётся снимок списка подписок, блокировка снимается,
    /// поэтому обработчики могут сами вызывать `schedule`/`cancel`/`deliver`.
    /// Подписки, добавленные во время доставки, в ней не участвуют;
    /// отменённые во время доставки всё равно будут вызваны.
    ///
    /// Первый обработчик, вернувший `Err`, прерывает доставку. Паника в
    /// обработчике не перехватывается.
    pub fn deliver(
        &self,
        route: &str,
        args: &[T],
    ) -> Result<&Self, DeliverError> {
        if route.is_empty() {
            return Ok(self);
        }

        let snapshot: Vec<Subscription<T>> = match self.routes.get(route) {
            Some(subs) => subs.clone(),
            None => {
                if self.config.log_unrouted {
                    debug!(courier = %self.name, route, "delivery to unknown route dropped");
                }
                return Ok(self);
            }
        };

        trace!(
            courier = %self.name,
            route,
            subscribers = snapshot.len(),
            args = args.len(),
            "delivering"
        );

        for (index, sub) in snapshot.iter().enumerate() {
            let delivery = Delivery::new(&self.name, route, sub.context(), args);
            if let Err(source) = sub.handler().call(&delivery) {
                warn!(
                    courier = %self.name,
                    route,
                    index,
                    error = %source,
                    "subscriber failed, delivery aborted"
                );
                return Err(DeliverError::subscriber(&*self.name, route, index, source));
            }
        }
        Ok(self)
    }

    pub fn has_route(
        &self,
        route: &str,
    ) -> bool {
        self.routes.contains_key(route)
    }

    /// Число подписок маршрута; `None`, если маршрута нет.
    pub fn subscriber_count(
        &self,
        route: &str,
    ) -> Option<usize> {
        self.routes.get(route).map(|subs| subs.len())
    }

    /// Имена маршрутов, отсортированные по алфавиту.
    pub fn routes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.iter().map(|e| e.key().to_string()).collect();
        names.sort_unstable();
        names
    }
}

impl<T> fmt::Debug for Courier<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Courier")
            .field("name", &self.name)
            .field("routes", &self.routes.len())
            .finish()
    }
}
