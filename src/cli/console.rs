//! Interactive text console
//!
//! Numbered menus over any `BufRead`/`Write` pair. Operation errors are
//! printed and control returns to the current menu; only I/O failures on the
//! console streams end the loop. End of input exits cleanly from any menu.

use crate::core::{
    AdminSession, Canteen, CatalogAdmin, PaymentMethod, Receipt, Session, Shopper,
    StudentSession, WalletAdmin, WalletDirection, WalletViewer,
};
use crate::io::parse_decimal;
use crate::types::{CanteenError, FoodItem, ItemId, Result};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

/// How a role menu was left
enum MenuExit {
    Logout,
    EndOfInput,
}

fn money(amount: Decimal) -> String {
    format!("₹{:.2}", amount)
}

fn parse_item_id(input: &str) -> Result<ItemId> {
    input
        .trim()
        .parse()
        .map_err(|_| CanteenError::invalid_argument(format!("'{}' is not a valid item id", input)))
}

fn parse_quantity(input: &str) -> Result<u32> {
    input
        .trim()
        .parse()
        .map_err(|_| CanteenError::invalid_argument(format!("'{}' is not a valid quantity", input)))
}

fn parse_amount(input: &str) -> Result<Decimal> {
    parse_decimal(input).map_err(CanteenError::invalid_argument)
}

/// Menu-driven front end over a [`Canteen`]
pub struct Console<'c, R, W> {
    canteen: &'c Canteen,
    input: R,
    output: W,
}

impl<'c, R: BufRead, W: Write> Console<'c, R, W> {
    pub fn new(canteen: &'c Canteen, input: R, output: W) -> Self {
        Console {
            canteen,
            input,
            output,
        }
    }

    /// Run the main menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== Canteen ===")?;
            writeln!(self.output, "1. Login")?;
            writeln!(self.output, "2. Register")?;
            writeln!(self.output, "3. Exit")?;
            let Some(choice) = self.prompt("Enter choice")? else {
                return Ok(());
            };

            let exit = match choice.as_str() {
                "1" => self.login()?,
                "2" => self.register()?,
                "3" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice")?;
                    MenuExit::Logout
                }
            };
            if let MenuExit::EndOfInput = exit {
                return Ok(());
            }
        }
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, error: &CanteenError) -> Result<()> {
        writeln!(self.output, "Error: {}", error)?;
        Ok(())
    }

    fn login(&mut self) -> Result<MenuExit> {
        let Some(username) = self.prompt("Username")? else {
            return Ok(MenuExit::EndOfInput);
        };
        let Some(password) = self.prompt("Password")? else {
            return Ok(MenuExit::EndOfInput);
        };

        match self.canteen.login(&username, &password) {
            Ok(Session::Admin(session)) => {
                writeln!(
                    self.output,
                    "Welcome, {} ({})",
                    session.username(),
                    session.canteen_name()
                )?;
                self.admin_menu(session)
            }
            Ok(Session::Student(session)) => {
                writeln!(
                    self.output,
                    "Welcome, {} ({})",
                    session.username(),
                    session.student_id()
                )?;
                self.student_menu(session)
            }
            Err(e) => {
                self.report(&e)?;
                Ok(MenuExit::Logout)
            }
        }
    }

    fn register(&mut self) -> Result<MenuExit> {
        let Some(username) = self.prompt("Username")? else {
            return Ok(MenuExit::EndOfInput);
        };
        let Some(password) = self.prompt("Password")? else {
            return Ok(MenuExit::EndOfInput);
        };
        let Some(wallet_password) = self.prompt("Wallet password")? else {
            return Ok(MenuExit::EndOfInput);
        };

        match self.canteen.register(&username, &password, &wallet_password) {
            Ok(student_id) => writeln!(
                self.output,
                "Registration successful. Your student ID is {}",
                student_id
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(MenuExit::Logout)
    }

    fn print_items(&mut self, items: &[FoodItem]) -> Result<()> {
        if items.is_empty() {
            writeln!(self.output, "No food items available")?;
            return Ok(());
        }
        writeln!(
            self.output,
            "{:<5} {:<20} {:<30} {:>10} {}",
            "ID", "Name", "Description", "Price", "Status"
        )?;
        for item in items {
            let status = if item.available {
                "Available"
            } else {
                "Unavailable"
            };
            writeln!(
                self.output,
                "{:<5} {:<20} {:<30} {:>10} {}",
                item.item_id,
                item.name,
                item.description,
                money(item.price),
                status
            )?;
        }
        Ok(())
    }

    fn print_receipt(&mut self, receipt: &Receipt) -> Result<()> {
        writeln!(self.output, "Order placed: {}", receipt.summary)?;
        writeln!(self.output, "Total: {}", money(receipt.total))?;
        match receipt.method {
            PaymentMethod::Wallet => {
                if let Some(balance) = receipt.remaining_balance {
                    writeln!(self.output, "Paid by wallet. Remaining balance: {}", money(balance))?;
                }
            }
            PaymentMethod::Cash => {
                if let Some(queue_number) = receipt.queue_number {
                    writeln!(
                        self.output,
                        "Please pay at the counter. Your queue number is {}",
                        queue_number
                    )?;
                }
            }
        }
        if !receipt.history_recorded {
            writeln!(
                self.output,
                "Warning: the order was paid but could not be saved to your history"
            )?;
        }
        Ok(())
    }

    fn student_menu(&mut self, mut session: StudentSession<'_>) -> Result<MenuExit> {
        loop {
            writeln!(self.output, "\n=== Student Menu ===")?;
            writeln!(self.output, "1. View menu")?;
            writeln!(self.output, "2. Add item to cart")?;
            writeln!(self.output, "3. View cart")?;
            writeln!(self.output, "4. Place order")?;
            writeln!(self.output, "5. Order history")?;
            writeln!(self.output, "6. Wallet balance")?;
            writeln!(self.output, "7. Logout")?;
            let Some(choice) = self.prompt("Enter choice")? else {
                return Ok(MenuExit::EndOfInput);
            };

            let outcome = match choice.as_str() {
                "1" => session
                    .browse_menu()
                    .and_then(|items| self.print_items(&items)),
                "2" => {
                    let Some(item_id) = self.prompt("Item ID")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    let Some(quantity) = self.prompt("Quantity")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    self.add_to_cart(&mut session, &item_id, &quantity)
                }
                "3" => self.show_cart(&session),
                "4" => match self.place_order(&mut session)? {
                    Some(outcome) => outcome,
                    None => return Ok(MenuExit::EndOfInput),
                },
                "5" => session
                    .order_history()
                    .and_then(|bills| {
                        if bills.is_empty() {
                            writeln!(self.output, "No orders yet")?;
                        }
                        for bill in bills {
                            writeln!(self.output, "{} - {}", bill.summary, money(bill.total))?;
                        }
                        Ok(())
                    }),
                "6" => session.wallet_balance().and_then(|balance| {
                    writeln!(self.output, "Wallet balance: {}", money(balance))?;
                    Ok(())
                }),
                "7" => {
                    session.logout();
                    writeln!(self.output, "Logged out")?;
                    return Ok(MenuExit::Logout);
                }
                _ => {
                    writeln!(self.output, "Invalid choice")?;
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                self.report(&e)?;
            }
        }
    }

    fn add_to_cart(
        &mut self,
        session: &mut StudentSession<'_>,
        item_id: &str,
        quantity: &str,
    ) -> Result<()> {
        let line = session.add_to_cart(parse_item_id(item_id)?, parse_quantity(quantity)?)?;
        writeln!(
            self.output,
            "Added {}x {} ({})",
            line.quantity,
            line.item.name,
            money(line.subtotal()?)
        )?;
        Ok(())
    }

    fn show_cart(&mut self, session: &StudentSession<'_>) -> Result<()> {
        let cart = session.cart();
        if cart.is_empty() {
            writeln!(self.output, "Cart is empty")?;
            return Ok(());
        }
        for line in cart.lines() {
            writeln!(
                self.output,
                "{}x {} @ {} = {}",
                line.quantity,
                line.item.name,
                money(line.item.price),
                money(line.subtotal()?)
            )?;
        }
        writeln!(self.output, "Total: {}", money(cart.total()))?;
        Ok(())
    }

    /// Outer `None` means input ended mid-dialog
    fn place_order(&mut self, session: &mut StudentSession<'_>) -> Result<Option<Result<()>>> {
        if session.cart().is_empty() {
            writeln!(self.output, "Cart is empty")?;
            return Ok(Some(Ok(())));
        }
        let total = session.cart().total();
        writeln!(self.output, "Order total: {}", money(total))?;
        writeln!(self.output, "1. Wallet")?;
        writeln!(self.output, "2. Cash")?;
        let Some(choice) = self.prompt("Payment method")? else {
            return Ok(None);
        };

        let receipt = match choice.as_str() {
            "1" => {
                let balance = match session.wallet_balance() {
                    Ok(balance) => balance,
                    Err(e) => return Ok(Some(Err(e))),
                };
                if balance < total {
                    writeln!(
                        self.output,
                        "Insufficient balance: {} available, {} required",
                        money(balance),
                        money(total)
                    )?;
                    return Ok(Some(Ok(())));
                }
                let Some(password) = self.prompt("Wallet password")? else {
                    return Ok(None);
                };
                session.checkout(PaymentMethod::Wallet, Some(password.as_str()))
            }
            "2" => session.checkout(PaymentMethod::Cash, None),
            _ => {
                writeln!(self.output, "Invalid payment method")?;
                return Ok(Some(Ok(())));
            }
        };

        Ok(Some(receipt.and_then(|receipt| self.print_receipt(&receipt))))
    }

    fn admin_menu(&mut self, session: AdminSession<'_>) -> Result<MenuExit> {
        loop {
            writeln!(self.output, "\n=== Admin Menu ===")?;
            writeln!(self.output, "1. Add food item")?;
            writeln!(self.output, "2. Show food items")?;
            writeln!(self.output, "3. Update item price")?;
            writeln!(self.output, "4. Remove food item")?;
            writeln!(self.output, "5. Set item availability")?;
            writeln!(self.output, "6. Update student wallet")?;
            writeln!(self.output, "7. Logout")?;
            let Some(choice) = self.prompt("Enter choice")? else {
                return Ok(MenuExit::EndOfInput);
            };

            let outcome = match choice.as_str() {
                "1" => {
                    let Some(name) = self.prompt("Name")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    let Some(description) = self.prompt("Description")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    let Some(price) = self.prompt("Price")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    parse_amount(&price)
                        .and_then(|price| session.add_item(&name, &description, price))
                        .and_then(|item| {
                            writeln!(
                                self.output,
                                "Added item {} ({}) at {}",
                                item.item_id,
                                item.name,
                                money(item.price)
                            )?;
                            Ok(())
                        })
                }
                "2" => session
                    .list_items()
                    .and_then(|items| self.print_items(&items)),
                "3" => {
                    let Some(item_id) = self.prompt("Item ID")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    let Some(price) = self.prompt("New price")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    parse_item_id(&item_id)
                        .and_then(|id| session.update_price(id, parse_amount(&price)?))
                        .and_then(|item| {
                            writeln!(
                                self.output,
                                "{} now costs {}",
                                item.name,
                                money(item.price)
                            )?;
                            Ok(())
                        })
                }
                "4" => {
                    let Some(item_id) = self.prompt("Item ID")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    parse_item_id(&item_id)
                        .and_then(|id| session.remove_item(id))
                        .and_then(|item| {
                            writeln!(self.output, "Removed {}", item.name)?;
                            Ok(())
                        })
                }
                "5" => {
                    let Some(item_id) = self.prompt("Item ID")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    let Some(answer) = self.prompt("Available? (y/n)")? else {
                        return Ok(MenuExit::EndOfInput);
                    };
                    let available = matches!(answer.to_lowercase().as_str(), "y" | "yes");
                    parse_item_id(&item_id)
                        .and_then(|id| session.set_availability(id, available))
                        .and_then(|item| {
                            let status = if item.available {
                                "available"
                            } else {
                                "unavailable"
                            };
                            writeln!(self.output, "{} is now {}", item.name, status)?;
                            Ok(())
                        })
                }
                "6" => match self.update_wallet(&session)? {
                    Some(outcome) => outcome,
                    None => return Ok(MenuExit::EndOfInput),
                },
                "7" => {
                    writeln!(self.output, "Logged out")?;
                    return Ok(MenuExit::Logout);
                }
                _ => {
                    writeln!(self.output, "Invalid choice")?;
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                self.report(&e)?;
            }
        }
    }

    /// Outer `None` means input ended mid-dialog
    fn update_wallet(&mut self, session: &AdminSession<'_>) -> Result<Option<Result<()>>> {
        let Some(student_id) = self.prompt("Student ID")? else {
            return Ok(None);
        };
        match session.wallet_balance_of(&student_id) {
            Ok(balance) => writeln!(self.output, "Current balance: {}", money(balance))?,
            Err(e) => return Ok(Some(Err(e))),
        }

        let Some(action) = self.prompt("Action (add/sub)")? else {
            return Ok(None);
        };
        let Some(amount) = self.prompt("Amount")? else {
            return Ok(None);
        };

        let outcome = action
            .parse::<WalletDirection>()
            .and_then(|direction| {
                session.adjust_wallet(&student_id, parse_amount(&amount)?, direction)
            })
            .and_then(|balance| {
                writeln!(self.output, "New balance: {}", money(balance))?;
                Ok(())
            });
        Ok(Some(outcome))
    }
}
