use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

mod battle;
mod event_bus;
mod ws;

pub type User = Rc<UserInner>;

#[derive(Debug, PartialEq)]
pub struct UserInner {
    pub user_id: RefCell<String>,
}

#[derive(Routable, Clone, Debug, PartialEq)]
pub enum Route {
    #[at("/battle")]
    Battle,
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Login /> },
        Route::Battle => html! { <battle::Battle /> },
        Route::NotFound => html! { <h1>{ "404" }</h1> },
    }
}

#[function_component(Main)]
fn app() -> Html {
    let ctx = use_state(|| {
        Rc::new(UserInner {
            user_id: RefCell::new("initial".to_string()),
        })
    });
    html! {
        <ContextProvider<User> context={(*ctx).clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<User>>
    }
}

#[function_component(Login)]
pub fn login() -> Html {
    let state = use_state(String::new);
    let user = use_context::<User>().unwrap();
    let oninput = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            state.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let onclick = {
        let state = state.clone();
        let user = user.clone();
        Callback::from(move |_| *user.user_id.borrow_mut() = (*state).clone())
    };
    html! {
        <div class={classes!("login-page")}>
            <div class={classes!("login-panel")}>
                <form class={classes!("login-form")}>
                    <input {oninput} placeholder="Player name"/>
                    <Link<Route> to={Route::Battle}>
                        <button {onclick} disabled={state.len() < 1}>
                            {"Find a game"}
                        </button>
                    </Link<Route>>
                </form>
            </div>
        </div>
    }
}

fn main() {
    yew::Renderer::<Main>::new().render();
}
